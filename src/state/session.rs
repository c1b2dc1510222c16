//! Session controller: owns the one game being edited, applies score mutations and
//! persists them through a trailing debounce. [`GameSession::close`] is the exit hook:
//! it cancels the pending deadline and writes synchronously before returning.

use std::{sync::Arc, time::Duration, time::SystemTime};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dao::{
        game::{DELETED_PLAYER_NAME, GameRepository},
        models::GameEntity,
    },
    state::{
        debounce::Debouncer,
        game::{Game, GameStatus, InconsistentGame, PlayerScore, ScoreSheet},
        model::{GameModel, ModelRegistry, ScoringType},
        scoring::{self, Standings},
    },
};

/// Rejections raised by the session controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The operation does not apply to this game's scoring type.
    #[error("operation requires a {expected:?} game")]
    WrongModel {
        /// Scoring type the operation works on.
        expected: ScoringType,
    },
    /// Scores of a finished game are frozen.
    #[error("game `{0}` is finished; scores can no longer change")]
    Finished(Uuid),
    /// Game names cannot be blank.
    #[error("game name must not be empty")]
    EmptyName,
}

/// Handle to the active game. Exactly one exists per live game view.
pub struct GameSession {
    id: Uuid,
    model: GameModel,
    game: Arc<Mutex<Game>>,
    persister: Debouncer,
}

impl GameSession {
    /// Load `game_id` and start a session on it.
    ///
    /// Returns `Ok(None)` when the game or its model is unknown.
    pub async fn open(
        repository: GameRepository,
        models: &ModelRegistry,
        game_id: Uuid,
        autosave_delay: Duration,
    ) -> Result<Option<Self>, InconsistentGame> {
        let Some(entity) = repository.find(game_id).await else {
            return Ok(None);
        };
        let Some(model) = models.get_model(&entity.model_id) else {
            warn!(game_id = %game_id, model_id = %entity.model_id, "game references an unknown model");
            return Ok(None);
        };
        let game = Game::from_entity(entity, model)?;
        Ok(Some(Self::start(repository, model.clone(), game, autosave_delay)))
    }

    /// Start a session on an already loaded game.
    pub fn start(
        repository: GameRepository,
        model: GameModel,
        game: Game,
        autosave_delay: Duration,
    ) -> Self {
        let id = game.id;
        let game = Arc::new(Mutex::new(game));
        let persister = {
            let game = Arc::clone(&game);
            Debouncer::spawn(autosave_delay, move || {
                let game = Arc::clone(&game);
                let repository = repository.clone();
                async move { persist(&repository, &game).await }
            })
        };
        debug!(game_id = %id, "session opened");

        Self {
            id,
            model,
            game,
            persister,
        }
    }

    /// Identifier of the game being edited.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Model the game follows.
    pub fn model(&self) -> &GameModel {
        &self.model
    }

    /// Copy of the current in-memory game.
    pub async fn snapshot(&self) -> Game {
        self.game.lock().await.clone()
    }

    /// Current leaderboard.
    pub async fn standings(&self) -> Standings {
        scoring::standings(&*self.game.lock().await)
    }

    /// Append one pending slot to every player at once. Returns the new round count.
    pub async fn add_round(&self) -> Result<usize, SessionError> {
        let mut rounds = 0;
        self.mutate(|game| {
            ensure_in_progress(game)?;
            ensure_scoring(game, &self.model, ScoringType::Rounds)?;
            for player in &mut game.players {
                if let ScoreSheet::Rounds(scores) = &mut player.sheet {
                    scores.push(None);
                }
            }
            rounds = game.round_count();
            Ok(true)
        })
        .await?;
        Ok(rounds)
    }

    /// Set (or, with `None`, clear back to pending) one round score.
    ///
    /// Indexes outside the table are ignored: a stale edit may arrive after the table
    /// changed, and rounds only ever come from [`GameSession::add_round`].
    pub async fn set_round_score(
        &self,
        player_index: usize,
        round_index: usize,
        value: Option<i32>,
    ) -> Result<(), SessionError> {
        self.mutate(|game| {
            ensure_in_progress(game)?;
            ensure_scoring(game, &self.model, ScoringType::Rounds)?;
            let Some(player) = game.players.get_mut(player_index) else {
                return Ok(false);
            };
            let ScoreSheet::Rounds(scores) = &mut player.sheet else {
                return Ok(false);
            };
            let Some(slot) = scores.get_mut(round_index) else {
                return Ok(false);
            };
            *slot = value;
            Ok(true)
        })
        .await
    }

    /// Set one category score, creating the entry when absent.
    pub async fn set_field_score(
        &self,
        player_index: usize,
        category_id: &str,
        value: i32,
    ) -> Result<(), SessionError> {
        self.mutate(|game| {
            ensure_in_progress(game)?;
            ensure_scoring(game, &self.model, ScoringType::Calculated)?;
            let Some(player) = game.players.get_mut(player_index) else {
                return Ok(false);
            };
            let ScoreSheet::Calculated(fields) = &mut player.sheet else {
                return Ok(false);
            };
            fields.insert(category_id.to_string(), value);
            Ok(true)
        })
        .await
    }

    /// Rename the game. Allowed whatever the status.
    pub async fn rename(&self, name: &str) -> Result<(), SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        self.mutate(|game| {
            if game.name == name {
                return Ok(false);
            }
            game.name = name.to_string();
            Ok(true)
        })
        .await
    }

    /// Move the game to `Finished` and persist right away. Repeated calls keep the
    /// first `finished_at`.
    pub async fn finish(&self) -> Result<(), SessionError> {
        let mut newly_finished = false;
        self.mutate(|game| {
            if game.is_finished() {
                return Ok(false);
            }
            let now = SystemTime::now();
            game.status = GameStatus::Finished;
            game.finished_at = Some(now);
            newly_finished = true;
            Ok(true)
        })
        .await?;

        if newly_finished {
            self.persister.flush().await;
        }
        Ok(())
    }

    /// Follow a registry rename on every seat held by `player_id`. Returns the number of
    /// seats rewritten.
    pub async fn rename_player(&self, player_id: Uuid, name: &str) -> usize {
        self.rewrite_seats(player_id, |seat| {
            seat.player_name = name.to_string();
        })
        .await
    }

    /// Detach a removed player from their seats, keeping the scores.
    pub async fn detach_player(&self, player_id: Uuid) -> usize {
        self.rewrite_seats(player_id, |seat| {
            seat.player_name = DELETED_PLAYER_NAME.to_string();
            seat.player_id = None;
        })
        .await
    }

    /// Exit hook: cancel the pending deadline and write pending edits immediately.
    pub async fn close(self) {
        let id = self.id;
        self.persister.close().await;
        debug!(game_id = %id, "session closed");
    }

    async fn mutate<F>(&self, edit: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut Game) -> Result<bool, SessionError>,
    {
        let mut game = self.game.lock().await;
        if edit(&mut game)? {
            game.updated_at = SystemTime::now();
            drop(game);
            self.persister.touch();
        }
        Ok(())
    }

    /// Registry changes apply whatever the status, finished games included.
    async fn rewrite_seats<F>(&self, player_id: Uuid, mut rewrite: F) -> usize
    where
        F: FnMut(&mut PlayerScore),
    {
        let mut game = self.game.lock().await;
        let mut touched = 0;
        for seat in game
            .players
            .iter_mut()
            .filter(|seat| seat.player_id == Some(player_id))
        {
            rewrite(seat);
            touched += 1;
        }
        if touched > 0 {
            game.updated_at = SystemTime::now();
            drop(game);
            self.persister.touch();
        }
        touched
    }
}

fn ensure_in_progress(game: &Game) -> Result<(), SessionError> {
    if game.is_finished() {
        return Err(SessionError::Finished(game.id));
    }
    Ok(())
}

fn ensure_scoring(game: &Game, model: &GameModel, expected: ScoringType) -> Result<(), SessionError> {
    let scoring = game.scoring().unwrap_or(model.scoring);
    if scoring != expected {
        return Err(SessionError::WrongModel { expected });
    }
    Ok(())
}

async fn persist(repository: &GameRepository, game: &Mutex<Game>) {
    let mut game = game.lock().await;
    game.updated_at = SystemTime::now();
    let entity: GameEntity = game.clone().into();
    if repository.save(&entity).await {
        debug!(game_id = %entity.id, "game persisted");
    } else {
        warn!(game_id = %entity.id, "game no longer stored; edits kept in memory only");
    }
}
