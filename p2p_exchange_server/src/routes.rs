//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t block
//! execution:
//!
//! ```nocompile
//!     async fn my_handler() -> impl Responder {
//!         tokio::time::sleep(Duration::from_secs(5)).await; // <-- Ok. Worker thread will handle other requests here
//!     }
//! ```
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use p2p_exchange_engine::{
    db_types::SessionId,
    traits::{BankGateway, CryptoGateway, ExchangeDatabase, UserManagement},
    ExchangeFlowApi,
    ExchangeFlowError,
    UserApi,
};
use pxg_common::CryptoCurrency;

use crate::{
    data_objects::{
        CurrencyCatalogue,
        MatchParams,
        MatchResponse,
        SessionQuery,
        SessionView,
        StatusResponse,
        WalletAddressResponse,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro.
// Requests for a known path with the wrong method get a JSON 405 instead of falling through to the 404 handler.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
                impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .route(actix_web::web::route().guard(actix_web::guard::$method()).to($name))
                        .default_service(actix_web::web::to($crate::routes::method_not_allowed));
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .route(
                        actix_web::web::route()
                            .guard(actix_web::guard::$method())
                            .to($name::< $( [< T $bounds:camel >], )+>),
                    )
                    .default_service(actix_web::web::to($crate::routes::method_not_allowed));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

pub async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse, ServerError> {
    debug!("💻️ {} is not supported on {}", req.method(), req.path());
    Err(ServerError::MethodNotAllowed)
}

pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ServerError> {
    debug!("💻️ No route for {} {}", req.method(), req.path());
    Err(ServerError::NoRecordFound(format!("No such endpoint: {}", req.path())))
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Match  ----------------------------------------------------
route!(match_order => Post "/match" impl ExchangeDatabase, BankGateway, CryptoGateway);
/// Route handler for the exchange form.
///
/// Accepts `amount`, `card_number` and an optional `currency` (default `TON`), either as JSON or as url-encoded form
/// data. On success a new exchange session is opened against the best matching order, and the response carries the
/// session id together with the relative URL of the confirmation step.
pub async fn match_order<B, K, C>(
    api: web::Data<ExchangeFlowApi<B, K, C>>,
    body: web::Either<web::Json<MatchParams>, web::Form<MatchParams>>,
) -> Result<HttpResponse, ServerError>
where
    B: ExchangeDatabase,
    K: BankGateway,
    C: CryptoGateway,
{
    let params = match body {
        web::Either::Left(json) => json.into_inner(),
        web::Either::Right(form) => form.into_inner(),
    };
    debug!("💻️ POST match for {:?} {:?}", params.amount, params.currency);
    let request = params.into_request()?;
    let outcome = api.match_order(request).await.map_err(|e| {
        info!("💻️ Could not match request. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(MatchResponse::from(outcome)))
}

//----------------------------------------------   Status  ----------------------------------------------------
route!(exchange_status => Get "/status" impl ExchangeDatabase, BankGateway, CryptoGateway);
/// Route handler for status polls.
///
/// Each poll of a session whose payout is still processing may complete the payout, so clients are expected to call
/// this endpoint repeatedly until `exchange_status` settles.
pub async fn exchange_status<B, K, C>(
    api: web::Data<ExchangeFlowApi<B, K, C>>,
    query: web::Query<SessionQuery>,
) -> Result<HttpResponse, ServerError>
where
    B: ExchangeDatabase,
    K: BankGateway,
    C: CryptoGateway,
{
    let id = SessionId::from(query.session_id()?);
    trace!("💻️ GET status for session {id}");
    let session = api.poll_status(&id).await?;
    Ok(HttpResponse::Ok().json(StatusResponse::from(session)))
}

//----------------------------------------------   Confirm  ----------------------------------------------------
route!(confirm => Post "/confirm" impl ExchangeDatabase, BankGateway, CryptoGateway);
/// Route handler for the confirmation step. Charges the buyer's card and starts the payout. Confirming a session a
/// second time returns its current state without charging the buyer again.
pub async fn confirm<B, K, C>(
    api: web::Data<ExchangeFlowApi<B, K, C>>,
    query: web::Query<SessionQuery>,
) -> Result<HttpResponse, ServerError>
where
    B: ExchangeDatabase,
    K: BankGateway,
    C: CryptoGateway,
{
    let id = SessionId::from(query.session_id()?);
    debug!("💻️ POST confirm for session {id}");
    let outcome = api.confirm_payment(&id).await?;
    Ok(HttpResponse::Ok().json(SessionView::from(outcome)))
}

//----------------------------------------------   Session  ----------------------------------------------------
route!(session => Get "/session" impl ExchangeDatabase, BankGateway, CryptoGateway);
pub async fn session<B, K, C>(
    api: web::Data<ExchangeFlowApi<B, K, C>>,
    query: web::Query<SessionQuery>,
) -> Result<HttpResponse, ServerError>
where
    B: ExchangeDatabase,
    K: BankGateway,
    C: CryptoGateway,
{
    let id = SessionId::from(query.session_id()?);
    trace!("💻️ GET session {id}");
    let details = api.session_details(&id).await?;
    Ok(HttpResponse::Ok().json(SessionView::from(details)))
}

//----------------------------------------------   Currencies  ----------------------------------------------------
route!(currencies => Get "/currencies");
pub async fn currencies() -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET currencies");
    Ok(HttpResponse::Ok().json(CurrencyCatalogue::default()))
}

//----------------------------------------------   Wallets  ----------------------------------------------------
route!(wallet_address => Get "/users/{user_id}/wallet/{currency}" impl UserManagement);
pub async fn wallet_address<B: UserManagement>(
    path: web::Path<(i64, String)>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (user_id, currency) = path.into_inner();
    debug!("💻️ GET {currency} wallet address for user #{user_id}");
    let currency = currency.parse::<CryptoCurrency>().map_err(ExchangeFlowError::from)?;
    let address = api.wallet_address(user_id, currency).await?;
    Ok(HttpResponse::Ok().json(WalletAddressResponse { user_id, currency, address }))
}
