use std::{env, error::Error, process::ExitCode, sync::Arc};

use backend::{
    auth::RestAuth,
    client::{BackendClient, BackendCredentials},
    repo::RestRepo,
};
use companion::{
    circuits::{load_circuit, load_circuits},
    config::CompanionConfig,
    home::load_home,
    lap_times::{load_lap_times, submit_lap_time, LapTimeEntry},
    leaderboard::LeaderboardScreen,
    profile::load_profile,
    races::{load_calendar, load_race_detail},
    repo::LeagueRepo,
    screen::ViewState,
    session::{FileTokenStorage, SessionState, SessionStore},
    RequestError,
};
use serde::Serialize;

mod command;

use command::Command;

const SESSION_FILE_VAR: &str = "KARTING_SESSION_FILE";
const EMAIL_VAR: &str = "KARTING_EMAIL";
const PASSWORD_VAR: &str = "KARTING_PASSWORD";

fn print<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn pilot_id<R: LeagueRepo>(
    repo: &R,
    session: &SessionStore,
) -> Result<utility::id::Id<model::pilot::Pilot>, RequestError> {
    let user = session.require_user()?;
    Ok(repo.pilot_by_user(&user).await?.id)
}

async fn run(command: Command) -> Result<(), Box<dyn Error>> {
    let config = CompanionConfig::from_env()?;
    let credentials = BackendCredentials::from_env()
        .ok_or("expected KARTING_BACKEND_URL and KARTING_BACKEND_KEY in env.")?;
    let client = BackendClient::new(&credentials)?;

    // session
    let storage = FileTokenStorage::new(
        env::var(SESSION_FILE_VAR).unwrap_or_else(|_| ".karting/session.json".to_owned()),
    );
    let session = SessionStore::new(
        Arc::new(RestAuth::new(client.clone())),
        Arc::new(storage),
    );
    let now = chrono::Utc::now();
    match (env::var(EMAIL_VAR), env::var(PASSWORD_VAR)) {
        (Ok(email), Ok(password)) => {
            session.sign_in(&email, &password).await?;
        }
        _ => {
            if let SessionState::SignedOut = *session.restore(now.timestamp()).await {
                log::info!("not signed in, reading as anonymous user");
            }
        }
    }

    let repo = RestRepo::new(client.with_session(session.subscribe()));
    let today = now.date_naive();

    match command {
        Command::Home => {
            let user = session.require_user()?;
            print(&load_home(&repo, &config, &user, today).await?)
        }
        Command::Standings(season) => {
            let screen = LeaderboardScreen::default();
            screen.select_season(&repo, season).await;
            match &*screen.screen().state() {
                ViewState::Ready(board) => print(board),
                ViewState::Failed(message) => Err(message.clone().into()),
                _ => Ok(()),
            }
        }
        Command::Races(season) => print(&load_calendar(&repo, season, today).await?),
        Command::Race(race) => print(&load_race_detail(&repo, race).await?),
        Command::Circuits => print(&load_circuits(&repo).await?),
        Command::Circuit(circuit) => print(&load_circuit(&repo, circuit).await?),
        Command::Laps(race) => {
            let pilot = pilot_id(&repo, &session).await?;
            print(&load_lap_times(&repo, pilot, race).await?)
        }
        Command::AddLap {
            race,
            lap_number,
            time,
            session: race_session,
        } => {
            let entry = LapTimeEntry {
                pilot_id: pilot_id(&repo, &session).await?,
                race_id: race,
                session_id: race_session,
                lap_number,
                time,
            };
            print(&submit_lap_time(&repo, &entry).await?)
        }
        Command::Profile => {
            let user = session.require_user()?;
            print(&load_profile(&repo, &user).await?)
        }
        Command::SignOut => {
            session.sign_out().await?;
            log::info!("signed out");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = env::args().skip(1).collect::<Vec<_>>();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(why) => {
            eprintln!("{why}");
            return ExitCode::from(2);
        }
    };

    match run(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(why) => {
            log::error!("{why}");
            eprintln!("{why}");
            ExitCode::FAILURE
        }
    }
}
