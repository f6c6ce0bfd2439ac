/// Shared extended property holding the game id on every event we publish.
pub const GAME_ID_PROPERTY: &str = "hammersId";

pub const DEFAULT_CLUB_NAME: &str = "West Ham";

pub const DEFAULT_TIMEZONE: &str = "Europe/London";

pub const DEFAULT_CALENDAR_LOCATION: &str = "Upton Park";

/// How long a fixture occupies in the fixture calendars.
pub const GAME_DURATION_HOURS: i64 = 2;

/// How long a ticket sale opening occupies in the ticket calendars.
pub const TICKET_DURATION_HOURS: i64 = 1;
