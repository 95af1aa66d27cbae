use std::{fmt, str::FromStr};

use model::{circuit::Circuit, race::Race, season::Season, session::Session};
use utility::id::Id;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Home,
    Standings(Option<Id<Season>>),
    Races(Option<Id<Season>>),
    Race(Id<Race>),
    Circuits,
    Circuit(Id<Circuit>),
    Laps(Id<Race>),
    AddLap {
        race: Id<Race>,
        lap_number: i32,
        time: String,
        session: Option<Id<Session>>,
    },
    Profile,
    SignOut,
}

pub const USAGE: &str = "usage: karting <command>

commands:
  home                                   dashboard of the signed in pilot
  standings [season]                     pilot and team standings
  races [season]                         race calendar
  race <race>                            classification of one race
  circuits                               all circuits
  circuit <circuit>                      one circuit
  laps <race>                            own lap times of a race
  add-lap <race> <lap> <time> [session]  record a lap time, e.g. 0:53.412
  profile                                own pilot profile
  sign-out                               forget the stored session";

#[derive(Debug, Clone, PartialEq)]
pub struct UsageError(pub String);

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\n\n{USAGE}", self.0)
    }
}

impl std::error::Error for UsageError {}

fn id<T>(value: Option<&String>, what: &str) -> Result<Id<T>, UsageError>
where
    T: utility::id::HasId,
    Id<T>: FromStr,
{
    let value = value.ok_or_else(|| UsageError(format!("missing {what}")))?;
    value
        .parse()
        .map_err(|_| UsageError(format!("'{value}' is not a valid {what}")))
}

fn optional_id<T>(value: Option<&String>, what: &str) -> Result<Option<Id<T>>, UsageError>
where
    T: utility::id::HasId,
    Id<T>: FromStr,
{
    value.map(|value| id(Some(value), what)).transpose()
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self, UsageError> {
        let Some((command, rest)) = args.split_first() else {
            return Err(UsageError("missing command".to_owned()));
        };
        let command = match command.as_str() {
            "home" => Self::Home,
            "standings" => Self::Standings(optional_id(rest.first(), "season")?),
            "races" => Self::Races(optional_id(rest.first(), "season")?),
            "race" => Self::Race(id(rest.first(), "race")?),
            "circuits" => Self::Circuits,
            "circuit" => Self::Circuit(id(rest.first(), "circuit")?),
            "laps" => Self::Laps(id(rest.first(), "race")?),
            "add-lap" => Self::AddLap {
                race: id(rest.first(), "race")?,
                lap_number: rest
                    .get(1)
                    .ok_or_else(|| UsageError("missing lap number".to_owned()))?
                    .parse()
                    .map_err(|_| UsageError("lap number must be a number".to_owned()))?,
                time: rest
                    .get(2)
                    .cloned()
                    .ok_or_else(|| UsageError("missing lap time".to_owned()))?,
                session: optional_id(rest.get(3), "session")?,
            },
            "profile" => Self::Profile,
            "sign-out" => Self::SignOut,
            other => return Err(UsageError(format!("unknown command '{other}'"))),
        };
        Ok(command)
    }
}
