pub mod fuzz;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use glizzy_common::config::{
    AddressType, DEFAULT_CHARS, DEFAULT_RESULTS_FILE, FuzzConfig, PayloadFill, ReportMode,
    SweepMode, Target,
};
use glizzy_common::gatt::HandleRange;

#[derive(Parser, Debug)]
#[command(name = "glizzy")]
#[command(version, about = "BLE GATT handle fuzzer / reader.")]
pub struct CommandLine {
    /// BLE device MAC address
    pub device: String,

    /// Service ranges to target (e.g. 0x1-0x9), repeatable
    #[arg(short = 's', long = "services")]
    pub services: Vec<HandleRange>,

    /// Explicit handles (e.g. 0x0003 or 0x0007-0x000a), repeatable. Wins over --services
    #[arg(short = 'H', long = "handles")]
    pub handles: Vec<HandleRange>,

    /// Filter discovered services by UUID prefix
    #[arg(short = 'u', long = "uuid")]
    pub uuid: Option<String>,

    /// Max payload length for incremental mode, fixed length with --runs
    #[arg(short = 'c', long = "chars", default_value_t = DEFAULT_CHARS)]
    pub chars: usize,

    /// Number of static-length writes per handle
    #[arg(short = 'n', long = "runs")]
    pub runs: Option<usize>,

    /// LE address type (public or random)
    #[arg(short = 'a', long = "addr-type", default_value_t = AddressType::Public)]
    pub addr_type: AddressType,

    /// Use random hex payloads instead of zeros
    #[arg(short = 'r', long = "random")]
    pub random: bool,

    /// Hex prefix to prepend to payloads
    #[arg(short = 'p', long = "prefix", value_parser = parse_hex_prefix)]
    pub prefix: Option<String>,

    /// Mirror output to a log file
    #[arg(short = 'l', long = "log")]
    pub log: Option<PathBuf>,

    /// Only read current values, no fuzzing
    #[arg(long = "read-only")]
    pub read_only: bool,

    /// Delay between writes, in seconds
    #[arg(long = "delay", value_parser = parse_delay)]
    pub delay: Option<Duration>,

    /// Listen for notifications after every write
    #[arg(long = "notify")]
    pub notify: bool,

    /// How long to listen for a notification, in seconds
    #[arg(long = "notify-timeout", default_value_t = 5)]
    pub notify_timeout: u64,

    /// Live status dashboard, press 'q' to stop
    #[arg(long = "tui")]
    pub tui: bool,

    /// Where to save the results
    #[arg(short = 'o', long = "output", default_value = DEFAULT_RESULTS_FILE)]
    pub output: PathBuf,

    /// gatttool binary to drive
    #[arg(long = "gatttool", default_value = "gatttool")]
    pub gatttool: String,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn target(&self) -> Target {
        Target::new(self.device.clone(), self.addr_type)
    }

    pub fn fuzz_config(&self) -> FuzzConfig {
        FuzzConfig {
            sweep: SweepMode::from_args(self.chars, self.runs),
            fill: if self.random {
                PayloadFill::Random
            } else {
                PayloadFill::Zero
            },
            prefix: self.prefix.clone().unwrap_or_default(),
            delay: self.delay.unwrap_or(Duration::ZERO),
            read_only: self.read_only,
            notify: self.notify,
            notify_timeout: Duration::from_secs(self.notify_timeout),
            report: if self.tui {
                ReportMode::Interactive
            } else {
                ReportMode::Headless
            },
        }
    }
}

fn parse_hex_prefix(s: &str) -> Result<String, String> {
    if s.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(s.to_ascii_lowercase())
    } else {
        Err(format!("prefix '{s}' is not hexadecimal"))
    }
}

fn parse_delay(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("invalid delay '{s}': {e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid delay '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use glizzy_common::gatt::Handle;

    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = CommandLine::try_parse_from(["glizzy", "AA:BB:CC:DD:EE:FF"]).unwrap();
        let cfg = cli.fuzz_config();

        assert_eq!(cfg.sweep, SweepMode::Incremental { max_len: 10 });
        assert_eq!(cfg.fill, PayloadFill::Zero);
        assert_eq!(cfg.delay, Duration::ZERO);
        assert_eq!(cfg.report, ReportMode::Headless);
        assert_eq!(cli.target().address_type, AddressType::Public);
        assert_eq!(cli.output, PathBuf::from("glizzy_results.json"));
        assert_eq!(cli.gatttool, "gatttool");
    }

    #[test]
    fn test_ranges_and_modes() {
        let cli = CommandLine::try_parse_from([
            "glizzy", "AA:BB:CC:DD:EE:FF", "-H", "0x3", "-H", "0x7-0xa", "-s", "0x1-0x9", "-n",
            "4", "-c", "16", "-r", "-p", "DE", "-a", "random", "--delay", "0.25", "--tui",
        ])
        .unwrap();

        assert_eq!(
            cli.handles,
            vec![
                HandleRange::single(Handle(3)),
                HandleRange::new(Handle(7), Handle(0xa)),
            ]
        );
        assert_eq!(cli.services.len(), 1);

        let cfg = cli.fuzz_config();
        assert_eq!(cfg.sweep, SweepMode::FixedRepeat { len: 16, runs: 4 });
        assert_eq!(cfg.fill, PayloadFill::Random);
        assert_eq!(cfg.prefix, "de");
        assert_eq!(cfg.delay, Duration::from_millis(250));
        assert_eq!(cfg.report, ReportMode::Interactive);
        assert_eq!(cli.target().address_type, AddressType::Random);
    }

    #[test]
    fn test_rejects_bad_input() {
        let base = ["glizzy", "AA:BB:CC:DD:EE:FF"];
        let with = |extra: &[&str]| {
            let args: Vec<&str> = base.iter().chain(extra.iter()).copied().collect();
            CommandLine::try_parse_from(args)
        };

        assert!(with(&["-p", "xyz"]).is_err());
        assert!(with(&["--delay", "-1"]).is_err());
        assert!(with(&["-a", "static"]).is_err());
        assert!(with(&["-H", "0x1-0x2-0x3"]).is_err());
        assert!(CommandLine::try_parse_from(["glizzy"]).is_err());
    }
}
