pub mod error;
pub mod orchestrator;
pub mod services;
pub mod use_cases;


pub use error::AuthError;
pub use orchestrator::AuthOrchestrator;
pub use services::{
    AccessGuard, NegotiationError, ScopeNegotiator, TfaError, TfaManager, generate_secret,
};
pub use use_cases::{
    AuthTokens, SecretHandoff,
    attach_device_token::AttachDeviceTokenUseCase,
    disable_tfa::DisableTfaUseCase,
    enable_tfa::EnableTfaUseCase,
    finalize_tfa::FinalizeTfaUseCase,
    login::{LoginRequest, LoginResponse, LoginUseCase},
    logout::LogoutUseCase,
    refresh_token::RefreshTokenUseCase,
    update_credentials::{CredentialsUpdate, CredentialsUpdated, UpdateCredentialsUseCase},
};
