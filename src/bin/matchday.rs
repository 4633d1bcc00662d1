//! matchday: run a single football data query from the command line.
//!
//! Loads configuration and secrets, builds the gateway, runs one query and
//! prints the resulting envelope as JSON on stdout. Logs go to stderr.

use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use matchday::{
    Config, FixturesQuery, HeadToHeadQuery, LeaguesQuery, LogFormat, MatchdayBuilder, Secrets,
    SportsData, SportsQuery, StandingsQuery, TeamStatisticsQuery, TeamsQuery,
};

/// Query the API-Sports football API through the matchday gateway.
#[derive(Parser)]
#[command(name = "matchday")]
#[command(version)]
#[command(about = "Rate-limited, cached football data queries")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// API key (overrides secrets file).
    #[arg(long, env = "API_SPORTS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search teams
    Teams(TeamsArgs),

    /// Retrieve fixtures
    Fixtures(FixturesArgs),

    /// Team statistics for a league season
    Statistics {
        #[arg(long)]
        league: u32,
        #[arg(long)]
        season: u32,
        #[arg(long)]
        team: u32,
        /// Statistics up to this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// League standings
    Standings {
        #[arg(long)]
        league: u32,
        #[arg(long)]
        season: u32,
        #[arg(long)]
        team: Option<u32>,
    },

    /// Head-to-head fixtures between two teams
    H2h(HeadToHeadArgs),

    /// Statistics for one fixture
    FixtureStats { fixture: u32 },

    /// Event timeline for one fixture
    Events { fixture: u32 },

    /// Lineups for one fixture
    Lineups { fixture: u32 },

    /// Predictions for one fixture
    Predictions { fixture: u32 },

    /// Search leagues and cups
    Leagues(LeaguesArgs),

    /// List available seasons
    Seasons,

    /// Show the configured call budget
    Budget,
}

#[derive(ClapArgs)]
struct TeamsArgs {
    #[arg(long)]
    id: Option<u32>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    league: Option<u32>,
    #[arg(long)]
    season: Option<u32>,
    #[arg(long)]
    country: Option<String>,
    /// Three-letter team code
    #[arg(long)]
    code: Option<String>,
    #[arg(long)]
    venue: Option<u32>,
    /// Free-text search (at least 3 characters)
    #[arg(long)]
    search: Option<String>,
}

impl From<TeamsArgs> for TeamsQuery {
    fn from(a: TeamsArgs) -> Self {
        TeamsQuery {
            id: a.id,
            name: a.name,
            league: a.league,
            season: a.season,
            country: a.country,
            code: a.code,
            venue: a.venue,
            search: a.search,
        }
    }
}

#[derive(ClapArgs)]
struct FixturesArgs {
    #[arg(long)]
    id: Option<u32>,
    /// Fixture ids joined by '-' (max 20)
    #[arg(long)]
    ids: Option<String>,
    /// "all" or league ids joined by '-'
    #[arg(long)]
    live: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    league: Option<u32>,
    #[arg(long)]
    season: Option<u32>,
    #[arg(long)]
    team: Option<u32>,
    #[arg(long)]
    last: Option<u32>,
    #[arg(long)]
    next: Option<u32>,
    #[arg(long)]
    from: Option<String>,
    #[arg(long)]
    to: Option<String>,
    #[arg(long)]
    round: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    venue: Option<u32>,
    #[arg(long)]
    timezone: Option<String>,
}

impl From<FixturesArgs> for FixturesQuery {
    fn from(a: FixturesArgs) -> Self {
        FixturesQuery {
            id: a.id,
            ids: a.ids,
            live: a.live,
            date: a.date,
            league: a.league,
            season: a.season,
            team: a.team,
            last: a.last,
            next: a.next,
            from: a.from,
            to: a.to,
            round: a.round,
            status: a.status,
            venue: a.venue,
            timezone: a.timezone,
        }
    }
}

#[derive(ClapArgs)]
struct HeadToHeadArgs {
    /// Two team ids joined by '-', e.g. 33-34
    h2h: String,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    league: Option<u32>,
    #[arg(long)]
    season: Option<u32>,
    #[arg(long)]
    last: Option<u32>,
    #[arg(long)]
    next: Option<u32>,
    #[arg(long)]
    from: Option<String>,
    #[arg(long)]
    to: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    venue: Option<u32>,
    #[arg(long)]
    timezone: Option<String>,
}

impl From<HeadToHeadArgs> for HeadToHeadQuery {
    fn from(a: HeadToHeadArgs) -> Self {
        HeadToHeadQuery {
            h2h: a.h2h,
            date: a.date,
            league: a.league,
            season: a.season,
            last: a.last,
            next: a.next,
            from: a.from,
            to: a.to,
            status: a.status,
            venue: a.venue,
            timezone: a.timezone,
        }
    }
}

#[derive(ClapArgs)]
struct LeaguesArgs {
    #[arg(long)]
    id: Option<u32>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    code: Option<String>,
    #[arg(long)]
    season: Option<u32>,
    #[arg(long)]
    team: Option<u32>,
    /// "league" or "cup"
    #[arg(long = "type")]
    kind: Option<String>,
    /// "true" or "false"
    #[arg(long)]
    current: Option<String>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    last: Option<u32>,
}

impl From<LeaguesArgs> for LeaguesQuery {
    fn from(a: LeaguesArgs) -> Self {
        LeaguesQuery {
            id: a.id,
            name: a.name,
            country: a.country,
            code: a.code,
            season: a.season,
            team: a.team,
            kind: a.kind,
            current: a.current,
            search: a.search,
            last: a.last,
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_env("MATCHDAY_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match config.logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    init_tracing(&config);
    let secrets = Secrets::load()?;

    let mut builder = MatchdayBuilder::from_config(&config, &secrets);
    if let Some(key) = args.api_key {
        builder = builder.api_key(key);
    }
    let gateway = builder.build()?;

    let query = match args.command {
        Command::Budget => {
            let budget = gateway.remaining_budget();
            println!("{}", serde_json::to_string_pretty(&budget)?);
            gateway.shutdown().await;
            return Ok(());
        }
        Command::Teams(a) => SportsQuery::Teams(a.into()),
        Command::Fixtures(a) => SportsQuery::Fixtures(a.into()),
        Command::Statistics {
            league,
            season,
            team,
            date,
        } => {
            let mut q = TeamStatisticsQuery::new(league, season, team);
            q.date = date;
            SportsQuery::TeamStatistics(q)
        }
        Command::Standings {
            league,
            season,
            team,
        } => {
            let mut q = StandingsQuery::new(league, season);
            q.team = team;
            SportsQuery::Standings(q)
        }
        Command::H2h(a) => SportsQuery::HeadToHead(a.into()),
        Command::FixtureStats { fixture } => SportsQuery::FixtureStatistics { fixture },
        Command::Events { fixture } => SportsQuery::FixtureEvents { fixture },
        Command::Lineups { fixture } => SportsQuery::FixtureLineups { fixture },
        Command::Predictions { fixture } => SportsQuery::Predictions { fixture },
        Command::Leagues(a) => SportsQuery::Leagues(a.into()),
        Command::Seasons => SportsQuery::Seasons,
    };

    let envelope = gateway.execute(&query).await;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    let failed = envelope.is_error();

    gateway.shutdown().await;
    if failed {
        std::process::exit(1);
    }
    Ok(())
}
