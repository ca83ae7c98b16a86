//! Tagged-union actions applied to the local store.

use crate::model::{Habit, HabitCompletion, PomodoroSession, Task, ThemeMode};

/// Every mutation of the local store is one of these.
///
/// The `*Loaded` variants are one-shot "load from database" replacements:
/// applying one swaps the whole local collection for the fetched rows.
#[derive(Debug, Clone)]
pub enum Action {
    TasksLoaded(Vec<Task>),
    HabitsLoaded(Vec<Habit>),
    CompletionsLoaded(Vec<HabitCompletion>),
    SessionsLoaded(Vec<PomodoroSession>),
    /// Theme preference resolved from settings (or the dark fallback).
    ThemeModeChanged(ThemeMode),
    /// OS color scheme flipped; only matters when the mode is System.
    SystemSchemeChanged { dark: bool },
}
