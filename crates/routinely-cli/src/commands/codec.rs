use clap::Subcommand;
use routinely_core::{format_countdown, format_duration, parse_duration, WallTime};

#[derive(Subcommand)]
pub enum CodecAction {
    /// Parse a duration ("25", "1:30", "1:02:03") into seconds
    Parse {
        input: String,
    },
    /// Format seconds the way routine cards show them
    Format {
        seconds: u64,
    },
    /// Format seconds the way the running countdown shows them
    Countdown {
        seconds: u64,
    },
    /// Compute the end time of a routine
    End {
        /// Start time, HH:MM or HH:MM:SS
        start: String,
        /// Duration, same syntax as `parse`
        duration: String,
    },
}

pub fn run(action: CodecAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CodecAction::Parse { input } => println!("{}", parse_duration(&input)?),
        CodecAction::Format { seconds } => println!("{}", format_duration(seconds)),
        CodecAction::Countdown { seconds } => println!("{}", format_countdown(seconds)),
        CodecAction::End { start, duration } => {
            let start = WallTime::parse(&start)?;
            let secs = parse_duration(&duration)?;
            println!("{}", start.plus_secs(secs));
        }
    }
    Ok(())
}
