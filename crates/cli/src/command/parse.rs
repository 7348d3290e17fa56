//! Parsing of command lines into [`Command`] values.
//!
//! Keywords are matched case-insensitively. Date-times are local wall-clock values
//! (`YYYY-MM-DDTHH:MM`); they get a zone only when the command runs.

use std::iter::Peekable;
use std::str::FromStr;
use std::vec::IntoIter;

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use chrono_tz::Tz;
use zonecal_core::Termination;

use super::tokenize::tokenize;
use crate::error::{CommandError, Result};

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateCalendar {
        name: String,
        zone: Tz,
    },
    EditCalendar {
        name: String,
        change: CalendarChange,
    },
    UseCalendar {
        name: String,
    },
    DeleteCalendar {
        name: String,
    },
    CreateEvent {
        subject: String,
        when: EventTimes,
        repeat: Option<Repeat>,
    },
    /// Changes one event, identified by subject and start (and end when given).
    EditEvent {
        property: Property,
        subject: String,
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
        value: String,
    },
    /// Changes every event with the subject starting at or after `from`.
    EditEvents {
        property: Property,
        subject: String,
        from: NaiveDateTime,
        value: String,
    },
    PrintOn {
        date: NaiveDate,
    },
    PrintBetween {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },
    ShowStatus {
        at: NaiveDateTime,
    },
    CopyEvent {
        subject: String,
        start: NaiveDateTime,
        target: String,
        target_start: NaiveDateTime,
    },
    CopyDay {
        date: NaiveDate,
        target: String,
        target_date: NaiveDate,
    },
    CopyRange {
        from: NaiveDate,
        to: NaiveDate,
        target: String,
        target_date: NaiveDate,
    },
    Exit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CalendarChange {
    Name(String),
    Zone(Tz),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTimes {
    Timed {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    AllDay(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repeat {
    pub days: Vec<Weekday>,
    pub termination: Termination,
}

/// Event properties that `edit` commands can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Subject,
    Start,
    End,
    Location,
    Description,
    Status,
}

impl FromStr for Property {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "subject" => Ok(Property::Subject),
            "start" => Ok(Property::Start),
            "end" => Ok(Property::End),
            "location" => Ok(Property::Location),
            "description" => Ok(Property::Description),
            "status" => Ok(Property::Status),
            _ => Err(CommandError::UnknownProperty(s.to_string())),
        }
    }
}

/// Parses one command line.
pub fn parse(line: &str) -> Result<Command> {
    let mut words = Words::new(tokenize(line)?);
    let Some(verb) = words.next_opt() else {
        return Err(CommandError::Empty);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "exit" | "quit" | "q" => Command::Exit,
        "create" => match words.choice("calendar or event")?.as_str() {
            "calendar" => create_calendar(&mut words)?,
            "event" => create_event(&mut words)?,
            _ => return Err(words.unexpected_last("calendar or event")),
        },
        "edit" => match words.choice("calendar, event or events")?.as_str() {
            "calendar" => edit_calendar(&mut words)?,
            "event" => edit_event(&mut words)?,
            "events" => edit_events(&mut words)?,
            _ => return Err(words.unexpected_last("calendar, event or events")),
        },
        "use" => {
            words.keyword("calendar")?;
            let name = CalendarFlags::parse(&mut words)?.name()?;
            Command::UseCalendar { name }
        }
        "delete" => {
            words.keyword("calendar")?;
            let name = CalendarFlags::parse(&mut words)?.name()?;
            Command::DeleteCalendar { name }
        }
        "print" => print(&mut words)?,
        "show" => {
            words.keyword("status")?;
            words.keyword("on")?;
            let at = parse_date_time(&words.next("date-time")?)?;
            Command::ShowStatus { at }
        }
        "copy" => match words.choice("event or events")?.as_str() {
            "event" => copy_event(&mut words)?,
            "events" => copy_events(&mut words)?,
            _ => return Err(words.unexpected_last("event or events")),
        },
        _ => return Err(CommandError::UnknownCommand(verb)),
    };

    words.finish()?;
    Ok(command)
}

fn create_calendar(words: &mut Words) -> Result<Command> {
    let mut flags = CalendarFlags::parse(words)?;
    let name = flags.name()?;
    let zone = parse_zone(
        &flags
            .timezone
            .take()
            .ok_or(CommandError::Missing("--timezone <zone>"))?,
    )?;
    Ok(Command::CreateCalendar { name, zone })
}

fn edit_calendar(words: &mut Words) -> Result<Command> {
    let mut flags = CalendarFlags::parse(words)?;
    let name = flags.name()?;
    let (property, value) = flags
        .property
        .take()
        .ok_or(CommandError::Missing("--property <name|timezone> <value>"))?;

    let change = match property.to_ascii_lowercase().as_str() {
        "name" => CalendarChange::Name(value),
        "timezone" => CalendarChange::Zone(parse_zone(&value)?),
        _ => return Err(CommandError::UnknownProperty(property)),
    };
    Ok(Command::EditCalendar { name, change })
}

fn create_event(words: &mut Words) -> Result<Command> {
    let subject = words.next("event subject")?;

    let when = match words.choice("from or on")?.as_str() {
        "from" => {
            let start = parse_date_time(&words.next("start date-time")?)?;
            words.keyword("to")?;
            let end = parse_date_time(&words.next("end date-time")?)?;
            EventTimes::Timed { start, end }
        }
        "on" => EventTimes::AllDay(parse_date(&words.next("date")?)?),
        _ => return Err(words.unexpected_last("from or on")),
    };

    let repeat = if words.peek_is("repeats") {
        words.keyword("repeats")?;
        Some(repeat(words)?)
    } else {
        None
    };

    Ok(Command::CreateEvent {
        subject,
        when,
        repeat,
    })
}

fn repeat(words: &mut Words) -> Result<Repeat> {
    let days = parse_weekdays(&words.next("weekday codes")?)?;

    let termination = match words.choice("for or until")?.as_str() {
        "for" => {
            let count = words.next("repeat count")?;
            let count = count
                .parse::<u32>()
                .map_err(|_| CommandError::InvalidCount(count))?;
            words.keyword("times")?;
            Termination::Count(count)
        }
        "until" => Termination::Until(parse_date(&words.next("until date")?)?),
        _ => return Err(words.unexpected_last("for or until")),
    };

    Ok(Repeat { days, termination })
}

fn edit_event(words: &mut Words) -> Result<Command> {
    let property = words.next("property")?.parse::<Property>()?;
    let subject = words.next("event subject")?;
    words.keyword("from")?;
    let start = parse_date_time(&words.next("start date-time")?)?;

    let end = if words.peek_is("to") {
        words.keyword("to")?;
        Some(parse_date_time(&words.next("end date-time")?)?)
    } else {
        None
    };

    words.keyword("with")?;
    let value = words.rest("new value")?;

    Ok(Command::EditEvent {
        property,
        subject,
        start,
        end,
        value,
    })
}

fn edit_events(words: &mut Words) -> Result<Command> {
    let property = words.next("property")?.parse::<Property>()?;
    let subject = words.next("event subject")?;
    words.keyword("from")?;
    let from = parse_date_time(&words.next("start date-time")?)?;
    words.keyword("with")?;
    let value = words.rest("new value")?;

    Ok(Command::EditEvents {
        property,
        subject,
        from,
        value,
    })
}

fn print(words: &mut Words) -> Result<Command> {
    words.keyword("events")?;

    match words.choice("on or from")?.as_str() {
        "on" => Ok(Command::PrintOn {
            date: parse_date(&words.next("date")?)?,
        }),
        "from" => {
            let from = parse_date_time(&words.next("start date-time")?)?;
            words.keyword("to")?;
            let to = parse_date_time(&words.next("end date-time")?)?;
            Ok(Command::PrintBetween { from, to })
        }
        _ => Err(words.unexpected_last("on or from")),
    }
}

fn copy_event(words: &mut Words) -> Result<Command> {
    let subject = words.next("event subject")?;
    words.keyword("on")?;
    let start = parse_date_time(&words.next("source date-time")?)?;
    let target = target(words)?;
    words.keyword("to")?;
    let target_start = parse_date_time(&words.next("target date-time")?)?;

    Ok(Command::CopyEvent {
        subject,
        start,
        target,
        target_start,
    })
}

fn copy_events(words: &mut Words) -> Result<Command> {
    match words.choice("on or between")?.as_str() {
        "on" => {
            let date = parse_date(&words.next("source date")?)?;
            let target = target(words)?;
            words.keyword("to")?;
            let target_date = parse_date(&words.next("target date")?)?;
            Ok(Command::CopyDay {
                date,
                target,
                target_date,
            })
        }
        "between" => {
            let from = parse_date(&words.next("first date")?)?;
            words.keyword("and")?;
            let to = parse_date(&words.next("last date")?)?;
            let target = target(words)?;
            words.keyword("to")?;
            let target_date = parse_date(&words.next("target date")?)?;
            Ok(Command::CopyRange {
                from,
                to,
                target,
                target_date,
            })
        }
        _ => Err(words.unexpected_last("on or between")),
    }
}

fn target(words: &mut Words) -> Result<String> {
    words.keyword("--target")?;
    words.next("target calendar")
}

pub(crate) fn parse_date_time(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .map_err(|_| CommandError::InvalidDateTime(value.to_string()))
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| CommandError::InvalidDate(value.to_string()))
}

pub(crate) fn parse_zone(value: &str) -> Result<Tz> {
    value
        .parse::<Tz>()
        .map_err(|_| CommandError::UnknownZone(value.to_string()))
}

/// Parses weekday codes: `M` Monday, `T` Tuesday, `W` Wednesday, `R` Thursday,
/// `F` Friday, `S` Saturday, `U` Sunday.
pub(crate) fn parse_weekdays(codes: &str) -> Result<Vec<Weekday>> {
    codes
        .chars()
        .map(|code| match code.to_ascii_uppercase() {
            'M' => Ok(Weekday::Mon),
            'T' => Ok(Weekday::Tue),
            'W' => Ok(Weekday::Wed),
            'R' => Ok(Weekday::Thu),
            'F' => Ok(Weekday::Fri),
            'S' => Ok(Weekday::Sat),
            'U' => Ok(Weekday::Sun),
            other => Err(CommandError::UnknownWeekday(other)),
        })
        .collect()
}

/// Flags shared by the calendar commands.
#[derive(Debug, Default)]
struct CalendarFlags {
    name: Option<String>,
    timezone: Option<String>,
    property: Option<(String, String)>,
}

impl CalendarFlags {
    fn parse(words: &mut Words) -> Result<Self> {
        let mut flags = Self::default();

        while let Some(flag) = words.next_opt() {
            match flag.to_ascii_lowercase().as_str() {
                "--name" => flags.name = Some(words.next("calendar name")?),
                "--timezone" => flags.timezone = Some(words.next("timezone")?),
                "--property" => {
                    let property = words.next("property name")?;
                    let value = words.next("property value")?;
                    flags.property = Some((property, value));
                }
                _ => {
                    return Err(CommandError::Unexpected {
                        expected: "--name, --timezone or --property",
                        found: flag,
                    })
                }
            }
        }

        Ok(flags)
    }

    fn name(&mut self) -> Result<String> {
        self.name
            .take()
            .ok_or(CommandError::Missing("--name <name>"))
    }
}

/// Cursor over the words of a command line.
struct Words {
    words: Peekable<IntoIter<String>>,
    last: String,
}

impl Words {
    fn new(words: Vec<String>) -> Self {
        Self {
            words: words.into_iter().peekable(),
            last: String::new(),
        }
    }

    fn next_opt(&mut self) -> Option<String> {
        let word = self.words.next()?;
        self.last = word.clone();
        Some(word)
    }

    fn next(&mut self, what: &'static str) -> Result<String> {
        self.next_opt().ok_or(CommandError::Missing(what))
    }

    /// Reads the next word lowercased, for matching against alternatives.
    fn choice(&mut self, what: &'static str) -> Result<String> {
        Ok(self.next(what)?.to_ascii_lowercase())
    }

    fn keyword(&mut self, keyword: &'static str) -> Result<()> {
        let word = self.next(keyword)?;
        if word.eq_ignore_ascii_case(keyword) {
            Ok(())
        } else {
            Err(CommandError::Unexpected {
                expected: keyword,
                found: word,
            })
        }
    }

    fn peek_is(&mut self, keyword: &str) -> bool {
        self.words
            .peek()
            .is_some_and(|word| word.eq_ignore_ascii_case(keyword))
    }

    /// Joins every remaining word with single spaces.
    fn rest(&mut self, what: &'static str) -> Result<String> {
        let rest: Vec<String> = self.words.by_ref().collect();
        if rest.is_empty() {
            return Err(CommandError::Missing(what));
        }
        Ok(rest.join(" "))
    }

    fn unexpected_last(&self, expected: &'static str) -> CommandError {
        CommandError::Unexpected {
            expected,
            found: self.last.clone(),
        }
    }

    fn finish(&mut self) -> Result<()> {
        match self.words.next() {
            Some(found) => Err(CommandError::Unexpected {
                expected: "end of command",
                found,
            }),
            None => Ok(()),
        }
    }
}
