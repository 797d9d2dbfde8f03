use crate::core::session::{Constants, Session, Submission};
use crate::core::{ConfigProvider, GuessRecord, Pipeline, SessionOutcome, Storage};
use crate::domain::model::{GroupHistory, GroupRow, PlayerRow, RoundOutcome};
use crate::utils::error::{GameError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

const GROUPING_STREAM: u64 = 0;
const SIMULATION_STREAM: u64 = 1;

pub const PLAYERS_FILE: &str = "players.csv";
pub const GROUPS_FILE: &str = "groups.tsv";
pub const SESSION_FILE: &str = "session.json";

/// Reads `round,participant,guess` rows.
pub fn parse_guesses(data: &[u8]) -> Result<Vec<GuessRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

fn to_delimited<'a, T, I>(rows: I, delimiter: u8) -> Result<Vec<u8>>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.into_inner().map_err(|e| GameError::ProcessingError {
        message: format!("failed to flush {} output: {}", delimiter as char, e.error()),
    })
}

fn round_outcome(session: &Session, round: u32) -> Result<RoundOutcome> {
    let subsession = session.subsession(round)?;

    let groups = subsession
        .groups
        .iter()
        .map(|g| GroupRow {
            round,
            group: g.id_in_subsession,
            average: g.average,
            two_thirds_avg: g.two_thirds_avg,
            best_guess: g.best_guess,
            num_winners: g.num_winners,
        })
        .collect();

    let players = subsession
        .groups
        .iter()
        .flat_map(|g| {
            g.players.iter().map(move |p| PlayerRow {
                round,
                group: g.id_in_subsession,
                participant: p.participant,
                id_in_group: p.id_in_group,
                role: p.role().ok(),
                guess: p.guess,
                is_winner: p.is_winner,
                payoff: p.payoff,
                round_payoff: p.round_payoff,
            })
        })
        .collect();

    Ok(RoundOutcome {
        round,
        groups,
        players,
        admin: session.admin_report(round)?,
    })
}

pub struct SessionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> SessionPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn rng(&self, stream: u64) -> StdRng {
        match self.config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }

    /// One uniformly random guess per participant and round.
    fn simulate_guesses(&self) -> Vec<GuessRecord> {
        let mut rng = self.rng(SIMULATION_STREAM);
        let guess_max = self.config.guess_max();

        (1..=self.config.num_rounds())
            .flat_map(|round| (1..=self.config.num_participants()).map(move |p| (round, p)))
            .map(|(round, participant)| GuessRecord {
                round,
                participant,
                guess: rng.gen_range(0..=guess_max),
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SessionPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<GuessRecord>> {
        match self.config.guesses_file() {
            Some(path) => {
                tracing::debug!("Reading guesses from: {}", path);
                let data = self.storage.read_file(path).await?;
                let records = parse_guesses(&data)?;
                tracing::debug!("Parsed {} guess rows", records.len());
                Ok(records)
            }
            None => {
                tracing::warn!("No guesses file configured, simulating guesses");
                Ok(self.simulate_guesses())
            }
        }
    }

    async fn transform(&self, data: Vec<GuessRecord>) -> Result<SessionOutcome> {
        let constants = Constants::from_config(&self.config);
        let num_rounds = constants.num_rounds;
        let mut rng = self.rng(GROUPING_STREAM);
        let mut session = Session::new(constants, self.config.num_participants(), &mut rng)?;

        let mut by_round: BTreeMap<u32, Vec<GuessRecord>> = BTreeMap::new();
        for record in data {
            by_round.entry(record.round).or_default().push(record);
        }
        if let Some(&round) = by_round.keys().find(|&&r| r == 0 || r > num_rounds) {
            return Err(GameError::UnknownRound { round });
        }

        let mut rounds = Vec::with_capacity(num_rounds as usize);
        for round in 1..=num_rounds {
            for record in by_round.remove(&round).unwrap_or_default() {
                if let Submission::GroupScored { group } =
                    session.submit_guess(round, record.participant, record.guess)?
                {
                    tracing::debug!(round, group, "all players arrived");
                }
            }

            let missing = session.subsession(round)?.missing_guesses();
            if missing > 0 {
                return Err(GameError::IncompleteRound { round, missing });
            }

            let ids: Vec<u32> = session.participants().iter().map(|p| p.id).collect();
            for participant in ids {
                session.finish_results(round, participant)?;
            }

            let outcome = round_outcome(&session, round)?;
            tracing::info!(
                round,
                avg_num = outcome.admin.avg_num,
                min_guess = outcome.admin.min_guess,
                max_guess = outcome.admin.max_guess,
                "round complete"
            );
            rounds.push(outcome);
        }

        let history = session
            .subsession(1)?
            .groups
            .iter()
            .map(|g| GroupHistory {
                group: g.id_in_subsession,
                two_thirds_avg: session.full_history(g.id_in_subsession).collect(),
            })
            .collect();

        Ok(SessionOutcome {
            name: session.constants().name_in_url.clone(),
            generated_at: chrono::Utc::now(),
            rounds,
            history,
            participants: session.participants().to_vec(),
        })
    }

    async fn load(&self, result: SessionOutcome) -> Result<String> {
        let formats = self.config.output_formats();
        let wants = |format: &str| formats.iter().any(|f| f == format);

        let mut files: Vec<(&str, Vec<u8>)> = Vec::new();
        if wants("csv") {
            files.push((PLAYERS_FILE, to_delimited(result.player_rows(), b',')?));
        }
        if wants("tsv") {
            files.push((GROUPS_FILE, to_delimited(result.group_rows(), b'\t')?));
        }
        if wants("json") {
            files.push((SESSION_FILE, serde_json::to_vec_pretty(&result)?));
        }

        if !self.config.compress() {
            for (name, data) in &files {
                tracing::debug!("Writing {} ({} bytes)", name, data.len());
                self.storage.write_file(name, data).await?;
            }
            return Ok(self.config.output_path().to_string());
        }

        let archive_name = format!("{}_results.zip", result.name);
        tracing::debug!("Creating ZIP file with {} files", files.len());

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, data) in &files {
                zip.start_file::<_, ()>(*name, FileOptions::default())?;
                zip.write_all(data)?;
            }
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&archive_name, &zip_data).await?;

        Ok(format!("{}/{}", self.config.output_path(), archive_name))
    }
}
