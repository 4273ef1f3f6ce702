use std::time::Duration;

use actix_web::{
    dev::Server,
    error::{JsonPayloadError, PathError, QueryPayloadError, UrlencodedError},
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpRequest,
    HttpServer,
};
use log::*;
use p2p_exchange_engine::{
    ExchangeFlowApi,
    SimulatedBank,
    SimulatedCryptoNetwork,
    SqliteDatabase,
    UserApi,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        not_found,
        ConfirmRoute,
        CurrenciesRoute,
        ExchangeStatusRoute,
        MatchOrderRoute,
        SessionRoute,
        WalletAddressRoute,
    },
};

pub const ACCESS_LOG_TARGET: &str = "pxg::access_log";

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::open_or_create(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.seed_test_data {
        db.reset_and_seed().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
        info!("💻️ Database has been reset and seeded with the demonstration data set");
    }
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let bank = SimulatedBank::new(config.bank_api_key.clone(), config.payment_success_probability);
    let crypto = SimulatedCryptoNetwork::new(config.crypto_api_key.clone(), config.payout_eta);
    let options = config.flow_options();
    debug!(
        "💻️ Bank approval rate: {}. Payout completion rate per poll: {}",
        config.payment_success_probability, options.payout_completion_probability
    );
    let srv = HttpServer::new(move || {
        let exchange_api = ExchangeFlowApi::new(db.clone(), bank.clone(), crypto.clone(), options);
        let user_api = UserApi::new(db.clone());
        let api_scope = web::scope("/api")
            .service(MatchOrderRoute::<SqliteDatabase, SimulatedBank, SimulatedCryptoNetwork>::new())
            .service(ExchangeStatusRoute::<SqliteDatabase, SimulatedBank, SimulatedCryptoNetwork>::new())
            .service(ConfirmRoute::<SqliteDatabase, SimulatedBank, SimulatedCryptoNetwork>::new())
            .service(SessionRoute::<SqliteDatabase, SimulatedBank, SimulatedCryptoNetwork>::new())
            .service(CurrenciesRoute::new())
            .service(WalletAddressRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %r").log_target(ACCESS_LOG_TARGET))
            .configure(configure_extractors)
            .app_data(web::Data::new(exchange_api))
            .app_data(web::Data::new(user_api))
            .service(health)
            .service(api_scope)
            .default_service(web::to(not_found))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Makes every extractor failure answer with the same JSON error body as the handlers do.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::FormConfig::default().error_handler(form_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error));
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("💻️ Could not deserialize JSON payload. {err}");
    ServerError::CouldNotDeserializePayload(err.to_string()).into()
}

fn form_error(err: UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    debug!("💻️ Could not deserialize form payload. {err}");
    ServerError::CouldNotDeserializePayload(err.to_string()).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("💻️ Invalid query string. {err}");
    ServerError::InvalidRequest(err.to_string()).into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    debug!("💻️ Invalid path parameters. {err}");
    ServerError::InvalidRequest(err.to_string()).into()
}
