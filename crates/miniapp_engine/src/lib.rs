//! Mini app engine: API gateway, host integration, storage and effect execution.
mod gateway;
mod host;
mod persist;
mod session;
mod storage;
mod types;

pub use gateway::{ApiGateway, GatewaySettings, ReqwestGateway, DEFAULT_API_BASE};
pub use host::{
    HostError, HostLaunchContext, HostWebApp, InitDataUnsafe, LaunchContext, LaunchData,
    Navigator, RecordingNavigator, StaticLaunchContext,
};
pub use persist::{ensure_storage_dir, FileLocalStorage, STORAGE_FILENAME};
pub use session::SessionController;
pub use storage::{
    load_credential, save_credential, LocalStorage, MemoryLocalStorage, StorageError,
    CREDENTIAL_KEY,
};
pub use types::{ApiError, FailureKind};
