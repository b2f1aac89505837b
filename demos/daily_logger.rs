use daylog::{Logger, RollingAppenderBuilder, Rotation};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let appender = RollingAppenderBuilder::new("./logs", "app.log")
        .rotation(Rotation::Daily)
        .max_keep_files(7) // Keep at most seven archived files
        .retention_days(7) // Delete archives older than a week
        .build()?;
    let mut logger = Logger::new("DailyLogger", appender);

    logger.info("Application started");
    logger.warning("This is a warning message");
    logger.error("This is an error message");
    logger.flush()?;

    println!("Logging setup complete. Logs will rotate daily and delete >7 days old.");
    Ok(())
}
