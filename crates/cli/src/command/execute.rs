//! Execution of parsed commands against a calendar registry.

use chrono::{DateTime, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use zonecal_core::event::{ALL_DAY_END, ALL_DAY_START};
use zonecal_core::{zone, Calendar, CalendarRegistry, Event, EventError, EventSeries, Status};

use super::parse::{parse_date_time, CalendarChange, Command, EventTimes, Property, Repeat};
use crate::cli::OutputFormat;
use crate::error::{CommandError, Result};
use crate::output;

/// Runs `command` and returns the text to show the user.
///
/// The output is empty for [`Command::Exit`], which ends a session before reaching
/// here in normal use.
pub fn execute(
    registry: &mut CalendarRegistry,
    command: Command,
    format: OutputFormat,
) -> Result<String> {
    match command {
        Command::CreateCalendar { name, zone } => {
            if !registry.create(&name, zone) {
                return Err(CommandError::NameUnavailable(name));
            }
            Ok(format!("Created calendar {name}"))
        }
        Command::EditCalendar { name, change } => edit_calendar(registry, name, change),
        Command::UseCalendar { name } => {
            if !registry.use_calendar(&name) {
                return Err(CommandError::UnknownCalendar(name));
            }
            Ok(format!("Using calendar {name}"))
        }
        Command::DeleteCalendar { name } => {
            if !registry.delete(&name) {
                return Err(CommandError::UnknownCalendar(name));
            }
            Ok(format!("Deleted calendar {name}"))
        }
        Command::CreateEvent {
            subject,
            when,
            repeat,
        } => {
            let calendar = active_mut(registry)?;
            match repeat {
                Some(repeat) => create_series(calendar, subject, when, repeat),
                None => create_event(calendar, subject, when),
            }
        }
        Command::EditEvent {
            property,
            subject,
            start,
            end,
            value,
        } => {
            let calendar = active_mut(registry)?;
            let change = Change::parse(property, &value, calendar.zone())?;

            let existing = match end {
                Some(end) => calendar.events().all().into_iter().find(|event| {
                    event.subject() == subject
                        && event.local_start() == start
                        && event.end().naive_local() == end
                }),
                None => calendar.events().find(&subject, start),
            }
            .cloned()
            .ok_or_else(|| CommandError::EventNotFound {
                subject: subject.clone(),
                start,
            })?;

            let replacement = change.apply(&existing)?;
            if !calendar.events_mut().replace(&existing, replacement) {
                return Err(CommandError::Duplicate(subject));
            }
            Ok(format!("Edited event {subject}"))
        }
        Command::EditEvents {
            property,
            subject,
            from,
            value,
        } => {
            let calendar = active_mut(registry)?;
            let change = Change::parse(property, &value, calendar.zone())?;
            let from_instant = calendar.localize(from);

            let edited = calendar
                .events_mut()
                .edit_series_from(&subject, &from_instant, |event| change.apply(event))?;
            if edited == 0 {
                return Err(CommandError::EventNotFound {
                    subject,
                    start: from,
                });
            }
            Ok(format!("Edited {edited} events of {subject}"))
        }
        Command::PrintOn { date } => {
            let calendar = active(registry)?;
            let from = calendar.start_of_day(date);
            let to = zone::end_of_day(calendar.zone(), date);
            let events = calendar.events().between(&from, &to);

            Ok(output::format_events(
                &events,
                format,
                false,
                &format!("No events on {date}"),
            ))
        }
        Command::PrintBetween { from, to } => {
            let calendar = active(registry)?;
            let events = calendar
                .events()
                .between(&calendar.localize(from), &calendar.localize(to));

            Ok(output::format_events(
                &events,
                format,
                true,
                &format!("No events between {} and {}", from, to),
            ))
        }
        Command::ShowStatus { at } => {
            let calendar = active(registry)?;
            if calendar.events().busy_during(&calendar.localize(at)) {
                Ok("Busy".to_string())
            } else {
                Ok("Not busy".to_string())
            }
        }
        Command::CopyEvent {
            subject,
            start,
            target,
            target_start,
        } => {
            let source = active(registry)?;
            if source.events().find(&subject, start).is_none() {
                return Err(CommandError::EventNotFound { subject, start });
            }
            let source_start = source.localize(start);
            let target_start = target_calendar(registry, &target)?.localize(target_start);

            if !registry.copy_event(&subject, &source_start, &target, &target_start)? {
                return Err(CommandError::Duplicate(subject));
            }
            Ok(format!("Copied event {subject} to {target}"))
        }
        Command::CopyDay {
            date,
            target,
            target_date,
        } => {
            let copied = registry.copy_day(date, &target, target_date)?;
            Ok(format!("{copied} events copied."))
        }
        Command::CopyRange {
            from,
            to,
            target,
            target_date,
        } => {
            let source_zone = active(registry)?.zone();
            let target_start = target_calendar(registry, &target)?.start_of_day(target_date);

            let copied = registry.copy_range(
                &zone::start_of_day(source_zone, from),
                &zone::end_of_day(source_zone, to),
                &target,
                &target_start,
            )?;
            Ok(format!("{copied} events copied."))
        }
        Command::Exit => Ok(String::new()),
    }
}

fn active(registry: &CalendarRegistry) -> Result<&Calendar> {
    registry.current().ok_or(CommandError::NoActiveCalendar)
}

fn active_mut(registry: &mut CalendarRegistry) -> Result<&mut Calendar> {
    registry.current_mut().ok_or(CommandError::NoActiveCalendar)
}

fn target_calendar<'a>(registry: &'a CalendarRegistry, name: &str) -> Result<&'a Calendar> {
    registry
        .get(name)
        .ok_or_else(|| CommandError::UnknownCalendar(name.to_string()))
}

fn edit_calendar(
    registry: &mut CalendarRegistry,
    name: String,
    change: CalendarChange,
) -> Result<String> {
    match change {
        CalendarChange::Name(new_name) => {
            if !registry.contains(&name) {
                return Err(CommandError::UnknownCalendar(name));
            }
            if !registry.rename(&name, &new_name) {
                return Err(CommandError::NameUnavailable(new_name));
            }
        }
        CalendarChange::Zone(zone) => {
            if !registry.set_zone(&name, zone) {
                return Err(CommandError::UnknownCalendar(name));
            }
        }
    }
    Ok("Successfully edited calendar".to_string())
}

fn create_event(calendar: &mut Calendar, subject: String, when: EventTimes) -> Result<String> {
    let event = match when {
        EventTimes::Timed { start, end } => Event::timed(
            subject.as_str(),
            calendar.localize(start),
            calendar.localize(end),
        )?,
        EventTimes::AllDay(date) => Event::all_day(subject.as_str(), date, calendar.zone())?,
    };

    if !calendar.events_mut().add(event) {
        return Err(CommandError::Duplicate(subject));
    }
    Ok(format!("Created event {subject}"))
}

fn create_series(
    calendar: &mut Calendar,
    subject: String,
    when: EventTimes,
    repeat: Repeat,
) -> Result<String> {
    let (start_time, end_time, anchor) = match when {
        EventTimes::Timed { start, end } => {
            if start.date() != end.date() {
                return Err(CommandError::MultiDaySeries);
            }
            (start.time(), end.time(), start.date())
        }
        EventTimes::AllDay(date) => (ALL_DAY_START, ALL_DAY_END, date),
    };

    let series = EventSeries::new(
        subject.as_str(),
        start_time,
        end_time,
        repeat.days,
        anchor,
        repeat.termination,
    )?;
    let added = series.add_to(calendar)?;
    Ok(format!("Created {added} events for {subject}"))
}

/// A new value for one event property, ready to apply.
#[derive(Debug, Clone)]
enum Change {
    Subject(String),
    Start(Moment),
    End(Moment),
    Location(String),
    Description(String),
    Status(Status),
}

/// A replacement start or end. A bare time keeps each event's own date.
#[derive(Debug, Clone, Copy)]
enum Moment {
    At(DateTime<Tz>),
    TimeOfDay(NaiveTime),
}

impl Change {
    fn parse(property: Property, value: &str, zone: Tz) -> Result<Self> {
        Ok(match property {
            Property::Subject => Change::Subject(value.to_string()),
            Property::Start => Change::Start(Moment::parse(value, zone)?),
            Property::End => Change::End(Moment::parse(value, zone)?),
            Property::Location => Change::Location(value.to_string()),
            Property::Description => Change::Description(value.to_string()),
            Property::Status => Change::Status(value.parse::<Status>()?),
        })
    }

    fn apply(&self, event: &Event) -> std::result::Result<Event, EventError> {
        let event = event.clone();
        match self {
            Change::Subject(subject) => event.with_subject(subject.as_str()),
            Change::Start(moment) => {
                let start = moment.resolve(event.zone(), event.local_start());
                event.with_start(start)
            }
            Change::End(moment) => {
                let end = moment.resolve(event.zone(), event.end().naive_local());
                event.with_end(end)
            }
            Change::Location(location) => Ok(event.with_location(location.as_str())),
            Change::Description(description) => Ok(event.with_description(description.as_str())),
            Change::Status(status) => Ok(event.with_status(*status)),
        }
    }
}

impl Moment {
    fn parse(value: &str, zone: Tz) -> Result<Self> {
        if let Ok(local) = parse_date_time(value) {
            return Ok(Moment::At(zone::resolve_local(zone, local)));
        }
        NaiveTime::parse_from_str(value, "%H:%M")
            .map(Moment::TimeOfDay)
            .map_err(|_| CommandError::InvalidTime(value.to_string()))
    }

    /// Resolves against the local value being replaced.
    fn resolve(self, zone: Tz, current: NaiveDateTime) -> DateTime<Tz> {
        match self {
            Moment::At(instant) => instant,
            Moment::TimeOfDay(time) => zone::resolve_local(zone, current.date().and_time(time)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse;
    use chrono::Timelike;
    use chrono_tz::America::{Los_Angeles, New_York};

    fn registry() -> CalendarRegistry {
        CalendarRegistry::with_default("work", New_York)
    }

    fn run(registry: &mut CalendarRegistry, line: &str) -> Result<String> {
        execute(registry, parse(line)?, OutputFormat::Pretty)
    }

    fn run_all(registry: &mut CalendarRegistry, lines: &[&str]) {
        for line in lines {
            run(registry, line).unwrap();
        }
    }

    #[test]
    fn test_calendar_lifecycle() {
        let mut registry = registry();

        assert_eq!(
            run(&mut registry, "create calendar --name home --timezone America/Los_Angeles")
                .unwrap(),
            "Created calendar home"
        );
        assert_eq!(
            run(&mut registry, "create calendar --name home --timezone UTC"),
            Err(CommandError::NameUnavailable("home".to_string()))
        );
        assert_eq!(
            run(&mut registry, "use calendar --name home").unwrap(),
            "Using calendar home"
        );
        assert_eq!(registry.current().unwrap().zone(), Los_Angeles);

        assert_eq!(
            run(&mut registry, "edit calendar --name home --property name house").unwrap(),
            "Successfully edited calendar"
        );
        assert_eq!(registry.current_name(), Some("house"));

        assert_eq!(
            run(&mut registry, "delete calendar --name house").unwrap(),
            "Deleted calendar house"
        );
        assert_eq!(registry.current_name(), Some("work"));
        assert_eq!(
            run(&mut registry, "use calendar --name house"),
            Err(CommandError::UnknownCalendar("house".to_string()))
        );
    }

    #[test]
    fn test_edit_calendar_errors() {
        let mut registry = registry();
        registry.create("home", Los_Angeles);

        assert_eq!(
            run(&mut registry, "edit calendar --name work --property name home"),
            Err(CommandError::NameUnavailable("home".to_string()))
        );
        assert_eq!(
            run(&mut registry, "edit calendar --name gone --property timezone UTC"),
            Err(CommandError::UnknownCalendar("gone".to_string()))
        );
        assert_eq!(
            run(&mut registry, "edit calendar --name gone --property name fresh"),
            Err(CommandError::UnknownCalendar("gone".to_string()))
        );
    }

    #[test]
    fn test_create_and_print_events() {
        let mut registry = registry();
        run_all(
            &mut registry,
            &[
                "create event Standup from 2025-05-01T09:00 to 2025-05-01T09:15",
                "create event Conference on 2025-05-01",
            ],
        );
        run(
            &mut registry,
            r#"edit event location Standup from 2025-05-01T09:00 with "Room 4""#,
        )
        .unwrap();

        assert_eq!(
            run(&mut registry, "print events on 2025-05-01").unwrap(),
            "- Conference (08:00 to 17:00)\n- Standup (09:00 to 09:15) @ Room 4"
        );
        assert_eq!(
            run(&mut registry, "print events on 2025-05-02").unwrap(),
            "No events on 2025-05-02"
        );
        assert_eq!(
            run(&mut registry, "print events from 2025-05-01T09:00 to 2025-05-01T10:00").unwrap(),
            "- Conference (2025-05-01T08:00 to 2025-05-01T17:00)\n\
             - Standup (2025-05-01T09:00 to 2025-05-01T09:15) @ Room 4"
        );
    }

    #[test]
    fn test_duplicate_event_rejected() {
        let mut registry = registry();
        let line = "create event Standup from 2025-05-01T09:00 to 2025-05-01T09:15";
        run(&mut registry, line).unwrap();

        assert_eq!(
            run(&mut registry, line),
            Err(CommandError::Duplicate("Standup".to_string()))
        );
    }

    #[test]
    fn test_invalid_range_is_reported() {
        let mut registry = registry();

        assert!(matches!(
            run(
                &mut registry,
                "create event Backwards from 2025-05-01T10:00 to 2025-05-01T09:00"
            ),
            Err(CommandError::Event(EventError::InvalidTimeRange { .. }))
        ));
    }

    #[test]
    fn test_show_status() {
        let mut registry = registry();
        run(
            &mut registry,
            "create event Standup from 2025-05-01T09:00 to 2025-05-01T09:15",
        )
        .unwrap();

        assert_eq!(
            run(&mut registry, "show status on 2025-05-01T09:00").unwrap(),
            "Busy"
        );
        assert_eq!(
            run(&mut registry, "show status on 2025-05-01T09:15").unwrap(),
            "Not busy"
        );
    }

    #[test]
    fn test_create_series() {
        let mut registry = registry();

        assert_eq!(
            run(
                &mut registry,
                "create event Gym from 2025-05-05T07:00 to 2025-05-05T08:00 repeats MW for 4 times"
            )
            .unwrap(),
            "Created 4 events for Gym"
        );
        assert_eq!(
            run(
                &mut registry,
                "create event Retreat on 2025-05-05 repeats F until 2025-05-31"
            )
            .unwrap(),
            "Created 4 events for Retreat"
        );
        assert_eq!(
            run(
                &mut registry,
                "create event Night from 2025-05-05T22:00 to 2025-05-06T01:00 repeats M for 2 times"
            ),
            Err(CommandError::MultiDaySeries)
        );
        assert_eq!(registry.current().unwrap().events().len(), 8);
    }

    #[test]
    fn test_edit_single_event() {
        let mut registry = registry();
        run_all(
            &mut registry,
            &[
                "create event Lunch from 2025-05-01T12:00 to 2025-05-01T13:00",
                "edit event start Lunch from 2025-05-01T12:00 to 2025-05-01T13:00 with 12:30",
                "edit event status Lunch from 2025-05-01T12:30 with private",
            ],
        );

        let calendar = registry.current().unwrap();
        let local = parse_date_time("2025-05-01T12:30").unwrap();
        let lunch = calendar.events().find("Lunch", local).unwrap();
        assert_eq!(lunch.status(), Status::Private);
        assert_eq!(lunch.end().hour(), 13);

        assert!(matches!(
            run(
                &mut registry,
                "edit event subject Lunch from 2025-05-01T12:30 to 2025-05-01T14:00 with Brunch"
            ),
            Err(CommandError::EventNotFound { .. })
        ));
        assert_eq!(
            run(&mut registry, "edit event status Lunch from 2025-05-01T12:30 with secret"),
            Err(CommandError::Event(EventError::UnknownStatus(
                "secret".to_string()
            )))
        );
    }

    #[test]
    fn test_edit_event_into_collision() {
        let mut registry = registry();
        run_all(
            &mut registry,
            &[
                "create event Lunch from 2025-05-01T12:00 to 2025-05-01T13:00",
                "create event Brunch from 2025-05-01T12:00 to 2025-05-01T13:00",
            ],
        );

        assert_eq!(
            run(&mut registry, "edit event subject Lunch from 2025-05-01T12:00 with Brunch"),
            Err(CommandError::Duplicate("Lunch".to_string()))
        );
        assert_eq!(registry.current().unwrap().events().len(), 2);
    }

    #[test]
    fn test_edit_event_picks_by_end() {
        let mut registry = registry();
        run_all(
            &mut registry,
            &[
                "create event Sync from 2025-05-01T09:00 to 2025-05-01T10:00",
                "create event Sync from 2025-05-01T09:00 to 2025-05-01T11:00",
            ],
        );

        assert_eq!(
            run(
                &mut registry,
                "edit event location Sync from 2025-05-01T09:00 to 2025-05-01T11:00 with Zoom"
            )
            .unwrap(),
            "Edited event Sync"
        );

        let events = registry.current().unwrap().events().all();
        let ends_and_locations: Vec<(u32, Option<&str>)> = events
            .iter()
            .map(|event| (event.end().hour(), event.location()))
            .collect();
        assert_eq!(ends_and_locations, vec![(10, None), (11, Some("Zoom"))]);
    }

    #[test]
    fn test_edit_series_from() {
        let mut registry = registry();
        run(
            &mut registry,
            "create event Gym from 2025-05-05T07:00 to 2025-05-05T08:00 repeats M for 4 times",
        )
        .unwrap();

        assert_eq!(
            run(&mut registry, "edit events location Gym from 2025-05-12T07:00 with Pool").unwrap(),
            "Edited 3 events of Gym"
        );
        assert_eq!(
            run(&mut registry, "edit events end Gym from 2025-05-19T07:00 with 08:30").unwrap(),
            "Edited 2 events of Gym"
        );

        let calendar = registry.current().unwrap();
        let events = calendar.events().all();
        let locations: Vec<Option<&str>> = events.iter().map(|e| e.location()).collect();
        assert_eq!(locations, vec![None, Some("Pool"), Some("Pool"), Some("Pool")]);
        let end_minutes: Vec<u32> = events.iter().map(|e| e.end().minute()).collect();
        assert_eq!(end_minutes, vec![0, 0, 30, 30]);

        assert!(matches!(
            run(&mut registry, "edit events location Swim from 2025-05-05T07:00 with Pool"),
            Err(CommandError::EventNotFound { .. })
        ));
    }

    #[test]
    fn test_edit_series_collision_rolls_back() {
        let mut registry = registry();
        run(
            &mut registry,
            "create event Gym from 2025-05-05T07:00 to 2025-05-05T08:00 repeats M for 3 times",
        )
        .unwrap();

        // The first event would start after its own end, so nothing changes.
        assert!(matches!(
            run(
                &mut registry,
                "edit events start Gym from 2025-05-05T07:00 with 2025-05-26T07:30"
            ),
            Err(CommandError::Edit(_))
        ));
        let events = registry.current().unwrap().events().all();
        assert!(events.iter().all(|e| e.start().minute() == 0));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_copy_commands() {
        let mut registry = registry();
        run_all(
            &mut registry,
            &[
                "create calendar --name home --timezone America/Los_Angeles",
                "create event Standup from 2025-05-01T09:00 to 2025-05-01T09:30",
                "create event Review from 2025-05-02T14:00 to 2025-05-02T15:00",
            ],
        );

        assert_eq!(
            run(
                &mut registry,
                "copy event Standup on 2025-05-01T09:00 --target home to 2025-05-01T06:00"
            )
            .unwrap(),
            "Copied event Standup to home"
        );
        assert_eq!(
            run(
                &mut registry,
                "copy events on 2025-05-02 --target home to 2025-05-09"
            )
            .unwrap(),
            "1 events copied."
        );
        assert_eq!(
            run(
                &mut registry,
                "copy events between 2025-05-01 and 2025-05-02 --target work to 2025-06-01"
            )
            .unwrap(),
            "2 events copied."
        );

        let home = registry.get("home").unwrap().events().all();
        let starts: Vec<String> = home
            .iter()
            .map(|e| e.start().format("%Y-%m-%dT%H:%M").to_string())
            .collect();
        assert_eq!(starts, vec!["2025-05-01T06:00", "2025-05-09T14:00"]);
        assert_eq!(registry.get("work").unwrap().events().len(), 4);
    }

    #[test]
    fn test_copy_errors() {
        let mut registry = registry();
        run(
            &mut registry,
            "create event Standup from 2025-05-01T09:00 to 2025-05-01T09:30",
        )
        .unwrap();

        assert!(matches!(
            run(
                &mut registry,
                "copy event Nothing on 2025-05-01T09:00 --target work to 2025-05-02T09:00"
            ),
            Err(CommandError::EventNotFound { .. })
        ));
        assert_eq!(
            run(
                &mut registry,
                "copy event Standup on 2025-05-01T09:00 --target gone to 2025-05-02T09:00"
            ),
            Err(CommandError::UnknownCalendar("gone".to_string()))
        );
        assert_eq!(
            run(
                &mut registry,
                "copy event Standup on 2025-05-01T09:00 --target work to 2025-05-01T09:00"
            ),
            Err(CommandError::Duplicate("Standup".to_string()))
        );
    }

    #[test]
    fn test_commands_need_active_calendar() {
        let mut registry = CalendarRegistry::new();

        assert_eq!(
            run(&mut registry, "print events on 2025-05-01"),
            Err(CommandError::NoActiveCalendar)
        );
        assert_eq!(
            run(&mut registry, "create event Standup on 2025-05-01"),
            Err(CommandError::NoActiveCalendar)
        );
    }
}
