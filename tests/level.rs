//! Severity parsing and filtering.

use ntclean::{Level, Logger, MemoryOutput};

#[test]
fn all_is_sorted_by_severity() {
    let all = Level::all();
    assert!(all.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(all.first(), Some(&Level::Trace));
    assert_eq!(all.last(), Some(&Level::Error));
}

#[test]
fn names_round_trip_through_display() {
    for level in Level::all() {
        assert_eq!(level.to_string().parse::<Level>(), Ok(level));
    }
}

#[test]
fn config_spellings_are_accepted() {
    assert_eq!(" Info ".parse::<Level>(), Ok(Level::Info));
    assert_eq!("WARNING".parse::<Level>(), Ok(Level::Warn));
    assert_eq!("err".parse::<Level>(), Ok(Level::Error));

    let err = "loud".parse::<Level>().unwrap_err();
    assert_eq!(err.to_string(), "unknown log level: 'loud'");
}

#[test]
fn tags_share_one_width() {
    let width = Level::Info.tag().len();
    assert!(Level::all().iter().all(|l| l.tag().len() == width));
    assert_eq!(Level::Warn.tag(), "[WARN ]");
}

#[test]
fn walk_details_hidden_at_the_default_level() {
    assert_eq!(Level::default(), Level::Info);

    let memory = MemoryOutput::new();
    let logger = Logger::builder().output(memory.clone()).build();
    logger.trace("WALK", "Deleted /tmp/a");
    logger.debug("PATHS", "No data root");
    logger.warn("WALK", "Cannot read /tmp/b");

    let records = memory.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::Warn);
}
