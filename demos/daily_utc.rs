use {
    daylog::{RollingAppenderBuilder, Rotation, TimeZone},
    std::io::Write,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut appender = RollingAppenderBuilder::new("./logs", "daily.log")
        .rotation(Rotation::Daily)
        .time_zone(TimeZone::UTC) // Use UTC for consistent timing across different regions
        .max_keep_files(7) // Keep one week of logs
        .build()?;

    // These logs will be rotated daily at UTC midnight
    writeln!(appender, "System startup - UTC timestamp will be used for rotation")?;
    writeln!(appender, "Configuration loaded successfully")?;
    writeln!(appender, "Server listening on port 8080")?;

    Ok(())
}
