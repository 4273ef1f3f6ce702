use chrono::Duration;
use cucumber::World;
use log::*;
use p2p_exchange_engine::{
    db_types::SessionId,
    test_utils::prepare_env::{create_database, random_db_path, run_migrations},
    ConfirmOutcome,
    ExchangeFlowApi,
    ExchangeFlowError,
    FlowOptions,
    MatchOutcome,
    SimulatedBank,
    SimulatedCryptoNetwork,
    SqliteDatabase,
};
use pxg_common::Secret;

pub type TestExchangeApi = ExchangeFlowApi<SqliteDatabase, SimulatedBank, SimulatedCryptoNetwork>;

#[derive(Default, Debug, World)]
pub struct ExchangeWorld {
    pub system: Option<ExchangeSystem>,
    pub last_match: Option<MatchOutcome>,
    pub last_confirm: Option<ConfirmOutcome>,
    pub last_error: Option<ExchangeFlowError>,
}

#[derive(Debug)]
pub struct ExchangeSystem {
    pub api: TestExchangeApi,
}

impl ExchangeWorld {
    pub fn api(&self) -> &TestExchangeApi {
        &self.system.as_ref().expect("ExchangeFlowApi not initialised").api
    }

    pub fn session_id(&self) -> SessionId {
        self.last_match.as_ref().expect("No session has been opened").session.id.clone()
    }
}

impl ExchangeSystem {
    pub async fn new(bank_success: f64, payout_completion: f64) -> Self {
        let url = prepare_test_env().await;
        let db = SqliteDatabase::new_with_url(&url, 1).await.expect("Error creating connection to database");
        db.reset_and_seed().await.expect("Error seeding database");
        debug!("Created database: {url}");
        let bank = SimulatedBank::new(Secret::new("cucumber".into()), bank_success);
        let crypto = SimulatedCryptoNetwork::new(Secret::new("cucumber".into()), Duration::seconds(300));
        let api = ExchangeFlowApi::new(db, bank, crypto, FlowOptions::new(1_000.0, payout_completion));
        Self { api }
    }
}

pub async fn prepare_test_env() -> String {
    let path = random_db_path();
    create_database(&path).await;
    run_migrations(&path).await;
    path
}
