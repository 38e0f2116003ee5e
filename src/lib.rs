//! # Warden - Token Authentication Core
//!
//! Facade crate re-exporting the public API of the warden components:
//! password login, optional or mandatory TOTP second factor, scoped access and
//! refresh tokens, revocation, and credential updates.
//!
//! ## Structure
//!
//! - **Core domain types**: `User`, `App`, `Scope`, `Token`, `Password`, etc.
//! - **Ports**: `UserStorage`, `TokenBlacklist`, `TokenService`, `SecretDelivery`
//! - **Application**: `AuthOrchestrator` and one use case per flow
//! - **Adapters**: `JwtTokenService`, `HashMapUserStore`, `RedisTokenBlacklist`, etc.
//! - **Service**: `AuthService` wires everything from `AuthServiceSetting`

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use warden_core::*;
}

pub use warden_core::{
    App, AppId, AuthContext, BasicUser, BlacklistEntry, Email, IssuedToken, Password,
    PasswordPolicy, Scope, TfaInfo, TfaSecret, TfaSettings, TfaStatus, TfaType, Token, TokenKind,
    User, UserError, UserId, intersect_scopes,
};

// ============================================================================
// Ports
// ============================================================================

pub use warden_core::{
    DeliveryError, SecretDelivery, TokenBlacklist, TokenBlacklistError, TokenError, TokenService,
    UserStorage, UserStoreError,
};

// ============================================================================
// Application Layer
// ============================================================================

/// Use cases and domain services
pub mod application {
    pub use warden_application::*;
}

pub use warden_application::{
    AccessGuard, AuthError, AuthOrchestrator, AuthTokens, CredentialsUpdate, CredentialsUpdated,
    LoginRequest, LoginResponse, ScopeNegotiator, SecretHandoff, TfaManager,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Configuration
    pub mod config {
        pub use warden_adapters::config::*;
    }

    /// Secret delivery channels
    pub mod delivery {
        pub use warden_adapters::delivery::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use warden_adapters::persistence::*;
    }

    /// Token signing
    pub mod tokens {
        pub use warden_adapters::tokens::*;
    }
}

pub use warden_adapters::{
    AuthServiceSetting, HashMapUserStore, HashSetTokenBlacklist, JwtTokenService,
    RedisTokenBlacklist, StubSecretDelivery,
};

// ============================================================================
// Auth Service (Main Entry Point)
// ============================================================================

pub use warden_service::{
    AuthService, InMemoryAuthService, ServiceError, configure_redis, get_redis_client,
    init_tracing,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the ports
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
