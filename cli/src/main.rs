mod commands;
mod terminal;
mod transport;

use std::process::ExitCode;

use commands::{CommandLine, fuzz};
use glizzy_common::error;
use glizzy_core::results::SweepStatus;
use indicatif::ProgressBar;
use terminal::{logging, print, theme::Theme};

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();
    let theme = Theme::default();

    // Shared with the log writer so lines print around the status line.
    let status_bar = commands.tui.then(ProgressBar::hidden);

    if let Err(e) = logging::init(commands.log.as_deref(), status_bar.clone()) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    print::banner(&theme);

    match fuzz::fuzz(&commands, status_bar, theme).await {
        Ok(status) => exit_code(status),
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Interrupted runs are saved but still exit non-zero.
fn exit_code(status: SweepStatus) -> ExitCode {
    match status {
        SweepStatus::Completed => ExitCode::SUCCESS,
        SweepStatus::Interrupted => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code(SweepStatus::Completed), ExitCode::SUCCESS);
        assert_eq!(exit_code(SweepStatus::Interrupted), ExitCode::FAILURE);
    }
}
