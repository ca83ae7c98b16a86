//! Configuration inspection.

use clap::Subcommand;

use crate::common;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the resolved environment configuration
    Show,
}

fn mask(value: &str) -> String {
    if value.is_empty() {
        "(unset)".to_string()
    } else if value.len() <= 8 {
        "****".to_string()
    } else {
        format!("{}****", &value[..4])
    }
}

pub async fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::context();
    match action {
        ConfigAction::Show => {
            let c = &ctx.config;
            println!("backend_url:         {}", if c.base_url.is_empty() { "(unset)" } else { &c.base_url });
            println!("anon_key:            {}", mask(&c.anon_key));
            println!("site_url:            {}", if c.site_url.is_empty() { "(unset)" } else { &c.site_url });
            println!("billing_key_ios:     {}", mask(&c.billing_key_ios));
            println!("billing_key_android: {}", mask(&c.billing_key_android));
        }
    }
    Ok(())
}
