mod calendar;
mod calendars;

pub use calendar::Calendar;
pub use calendars::CalendarRegistry;
