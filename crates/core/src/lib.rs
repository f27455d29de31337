pub mod auth;
pub mod bridge;
pub mod cache;
pub mod config;
pub mod context;
pub mod delivery;
pub mod dispatcher;
pub mod library;
pub mod messages;
pub mod metrics;
pub mod orchestrator;
pub mod testing;
pub mod transport;

pub use auth::{
    create_authenticator, AccessTokenAuthenticator, AuthError, AuthRequest, Authenticator,
    Identity, NoneAuthenticator,
};
pub use bridge::{BlockingBridge, BridgeError};
pub use cache::{CacheLocator, CacheLookup, HitSource};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthMethod, Config, ConfigError,
    SanitizedConfig,
};
pub use context::{ReplyTarget, RequestContext};
pub use delivery::{DeliveryNotifier, DeliveryReport};
pub use dispatcher::{Command, Dispatch, RequestDispatcher, TaskSpawner, TokioSpawner};
pub use library::{
    CacheIndex, ContentLibrary, DirectoryCacheIndex, FetchOutcome, LibraryError, SubprocessLibrary,
};
pub use orchestrator::{DownloadOrchestrator, OrchestrationOutcome, OrchestratorError};
pub use transport::{Transport, TransportError};
