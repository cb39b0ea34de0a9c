pub mod claims;
pub mod config;
pub mod error;
pub mod extractors;
pub mod guards;
pub mod middleware;
pub mod signer;
pub mod token;
pub mod verifier;

pub use claims::{Claims, TokenClaims};
pub use config::JwtConfig;
pub use error::{AuthError, AuthResult};
pub use extractors::{attach, retrieve, AuthContext};
pub use guards::{tenant_id_from_path, GuardError};
pub use middleware::{authenticate, tenant_scope, tenant_scoped};
pub use signer::{sign, verify_signature};
pub use token::encode_token;
pub use verifier::JwtVerifier;
