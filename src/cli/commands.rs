use clap::Subcommand;

use super::config::ConfigArgs;
use super::replay::ReplayArgs;
use super::step::StepArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Replay a step sequence, optionally driven by CSV rows
    Replay(ReplayArgs),

    /// Run one step directly, bypassing the engine/session lifecycle
    Step(StepArgs),

    /// Show or validate the replay configuration
    Config(ConfigArgs),

    /// Show version and default strategy priority
    Info,
}
