//! [`Command`] for authorizing a [`tenant::Session`].

use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use tracerr::Traced;

use crate::{
    domain::tenant::{self, session},
    error::{Classify, Kind},
    Service,
};
#[cfg(doc)]
use crate::domain::Tenant;

use super::Command;

/// [`Command`] for authorizing a [`tenant::Session`] out of its token,
/// issued by an external authority.
#[derive(Clone, Debug, From)]
pub struct AuthorizeTenantSession {
    /// [`tenant::Session`] token to authorize.
    pub token: session::Token,
}

impl<Db> Command<AuthorizeTenantSession> for Service<Db> {
    type Ok = tenant::Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeTenantSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeTenantSession { token } = cmd;

        Ok(jsonwebtoken::decode::<tenant::Session>(
            token.as_ref(),
            &self.config().jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims)
    }
}

/// Error of [`AuthorizeTenantSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`jsonwebtoken`] decoding error, including an expired [`Tenant`]
    /// session.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),
}

impl Classify for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::JsonWebTokenDecodeError(_) => Kind::Validation,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;
    use jsonwebtoken::{EncodingKey, Header};

    use crate::{
        domain::tenant::{self, session},
        error::{Classify as _, Kind},
        fixture, Command as _,
    };

    use super::AuthorizeTenantSession;

    fn token(session: &tenant::Session, secret: &[u8]) -> session::Token {
        let jwt = jsonwebtoken::encode(
            &Header::default(),
            session,
            &EncodingKey::from_secret(secret),
        )
        .unwrap();
        #[expect(unsafe_code, reason = "freshly encoded")]
        unsafe {
            session::Token::new_unchecked(jwt)
        }
    }

    #[tokio::test]
    async fn accepts_valid_token() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let session = tenant::Session {
            tenant_id,
            expires_at: (DateTime::now() + fixture::DAY).coerce(),
        };

        let authorized = svc
            .execute(AuthorizeTenantSession {
                token: token(&session, fixture::JWT_SECRET),
            })
            .await
            .unwrap();

        assert_eq!(authorized.tenant_id, tenant_id);
    }

    #[tokio::test]
    async fn rejects_expired_or_foreign_token() {
        let svc = fixture::service();
        let expired = tenant::Session {
            tenant_id: tenant::Id::new(),
            expires_at: (DateTime::now() - fixture::DAY).coerce(),
        };
        let valid = tenant::Session {
            tenant_id: tenant::Id::new(),
            expires_at: (DateTime::now() + fixture::DAY).coerce(),
        };

        for token in [
            token(&expired, fixture::JWT_SECRET),
            token(&valid, b"another secret"),
        ] {
            let err = svc
                .execute(AuthorizeTenantSession { token })
                .await
                .unwrap_err();
            assert_eq!(err.kind(), Kind::Validation);
        }
    }
}
