//! # Function Dispatcher
//!
//! Maps a function name and its string arguments to a typed call, resolves
//! the caller, and runs the call against the registry.
//!
//! ## Surfaces
//!
//! | Surface | Function | Arguments |
//! |---------|----------|-----------|
//! | invoke | `create_mortgage` | `mortgage_id` |
//! | invoke | `pl_to_sl` | `recipient`, `mortgage_id` |
//! | invoke, query | `ping` | ignored |
//! | query | `get_mortgage_details` | `mortgage_id` |
//! | query | `check_unique_mortgage` | `mortgage_id` |
//! | query | `get_mortgages` | none |
//! | query | `get_ecert` | `name` |
//!
//! The function name is parsed before the caller is resolved, so an
//! unknown name is always `UnknownFunction`. `ping` never resolves the
//! caller.

use crate::domain::errors::RegistryError;
use crate::ports::inbound::MortgageRegistryApi;
use ml_02_identity::IdentityResolver;
use serde::Serialize;
use shared_types::{
    Affiliation, CallerIdentity, InvocationContext, InvocationKind, InvocationRequest,
    InvocationResponse,
};
use tracing::{debug, instrument, warn};

/// Accompanies a `false` uniqueness result.
pub const NOT_UNIQUE_NOTICE: &str = "mortgage is not unique";

fn expect_args(function: &str, args: &[String], expected: usize) -> Result<(), RegistryError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RegistryError::InvalidArguments {
            function: function.to_string(),
            expected,
            actual: args.len(),
        })
    }
}

/// A state-changing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeCall {
    /// `create_mortgage(mortgage_id)`
    CreateMortgage {
        /// New mortgage id.
        mortgage_id: String,
    },
    /// `pl_to_sl(recipient, mortgage_id)`
    PlToSl {
        /// Recipient identifier. Role fixed to secondary lender.
        recipient: String,
        /// Mortgage to transfer.
        mortgage_id: String,
    },
    /// `ping()`
    Ping,
}

impl InvokeCall {
    /// Parse a named invocation.
    pub fn parse(function: &str, args: &[String]) -> Result<Self, RegistryError> {
        match function {
            "create_mortgage" => {
                expect_args(function, args, 1)?;
                Ok(InvokeCall::CreateMortgage {
                    mortgage_id: args[0].clone(),
                })
            }
            "pl_to_sl" => {
                expect_args(function, args, 2)?;
                Ok(InvokeCall::PlToSl {
                    recipient: args[0].clone(),
                    mortgage_id: args[1].clone(),
                })
            }
            "ping" => Ok(InvokeCall::Ping),
            other => Err(RegistryError::UnknownFunction {
                name: other.to_string(),
            }),
        }
    }
}

/// A read-only call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryCall {
    /// `get_mortgage_details(mortgage_id)`
    GetMortgageDetails {
        /// Mortgage to read.
        mortgage_id: String,
    },
    /// `check_unique_mortgage(mortgage_id)`
    CheckUniqueMortgage {
        /// Candidate id.
        mortgage_id: String,
    },
    /// `get_mortgages()`
    GetMortgages,
    /// `get_ecert(name)`
    GetEcert {
        /// Participant name.
        name: String,
    },
    /// `ping()`
    Ping,
}

impl QueryCall {
    /// Parse a named query.
    pub fn parse(function: &str, args: &[String]) -> Result<Self, RegistryError> {
        match function {
            "get_mortgage_details" => {
                expect_args(function, args, 1)?;
                Ok(QueryCall::GetMortgageDetails {
                    mortgage_id: args[0].clone(),
                })
            }
            "check_unique_mortgage" => {
                expect_args(function, args, 1)?;
                Ok(QueryCall::CheckUniqueMortgage {
                    mortgage_id: args[0].clone(),
                })
            }
            "get_mortgages" => {
                expect_args(function, args, 0)?;
                Ok(QueryCall::GetMortgages)
            }
            "get_ecert" => {
                expect_args(function, args, 1)?;
                Ok(QueryCall::GetEcert {
                    name: args[0].clone(),
                })
            }
            "ping" => Ok(QueryCall::Ping),
            other => Err(RegistryError::UnknownFunction {
                name: other.to_string(),
            }),
        }
    }
}

/// Successful dispatch result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutput {
    /// Response payload, if the function has one.
    pub payload: Option<String>,
    /// Non-fatal notice.
    pub notice: Option<String>,
}

impl DispatchOutput {
    fn empty() -> Self {
        Self::default()
    }

    fn text(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
            notice: None,
        }
    }

    fn json<T: Serialize>(value: &T) -> Result<Self, RegistryError> {
        let payload = serde_json::to_string(value).map_err(|e| RegistryError::CorruptRecord {
            key: "response".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::text(payload))
    }
}

/// Routes calls to the registry.
pub struct Dispatcher<R: MortgageRegistryApi, I: IdentityResolver> {
    registry: R,
    resolver: I,
}

impl<R: MortgageRegistryApi, I: IdentityResolver> Dispatcher<R, I> {
    /// Dispatcher over `registry`, identifying callers with `resolver`.
    pub fn new(registry: R, resolver: I) -> Self {
        Self { registry, resolver }
    }

    /// The wrapped registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    fn caller(&self, ctx: &InvocationContext) -> Result<CallerIdentity, RegistryError> {
        self.resolver
            .resolve_caller(ctx)
            .map_err(RegistryError::IdentityResolution)
    }

    /// Run a state-changing function.
    #[instrument(skip(self, args, ctx))]
    pub fn invoke(
        &self,
        function: &str,
        args: &[String],
        ctx: &InvocationContext,
    ) -> Result<DispatchOutput, RegistryError> {
        match InvokeCall::parse(function, args)? {
            InvokeCall::Ping => Ok(DispatchOutput::text(self.registry.ping())),
            InvokeCall::CreateMortgage { mortgage_id } => {
                let caller = self.caller(ctx)?;
                self.registry.create(&caller, &mortgage_id)?;
                Ok(DispatchOutput::empty())
            }
            InvokeCall::PlToSl {
                recipient,
                mortgage_id,
            } => {
                let caller = self.caller(ctx)?;
                self.registry.transfer(
                    &caller,
                    &mortgage_id,
                    &recipient,
                    Affiliation::SecondaryLender,
                )?;
                Ok(DispatchOutput::empty())
            }
        }
    }

    /// Run a read-only function.
    #[instrument(skip(self, args, ctx))]
    pub fn query(
        &self,
        function: &str,
        args: &[String],
        ctx: &InvocationContext,
    ) -> Result<DispatchOutput, RegistryError> {
        let call = QueryCall::parse(function, args)?;
        if call == QueryCall::Ping {
            return Ok(DispatchOutput::text(self.registry.ping()));
        }

        // Every other query is on behalf of an identified caller
        let caller = self.caller(ctx)?;
        match call {
            QueryCall::GetMortgageDetails { mortgage_id } => {
                DispatchOutput::json(&self.registry.get_details(&caller, &mortgage_id)?)
            }
            QueryCall::CheckUniqueMortgage { mortgage_id } => {
                if self.registry.check_unique(&mortgage_id)? {
                    Ok(DispatchOutput::text("true"))
                } else {
                    Ok(DispatchOutput {
                        payload: Some("false".to_string()),
                        notice: Some(NOT_UNIQUE_NOTICE.to_string()),
                    })
                }
            }
            QueryCall::GetMortgages => DispatchOutput::json(&self.registry.list_visible(&caller)?),
            QueryCall::GetEcert { name } => Ok(DispatchOutput::text(self.registry.get_ecert(&name)?)),
            QueryCall::Ping => Ok(DispatchOutput::text(self.registry.ping())),
        }
    }

    /// Run one enveloped request and build its response. Never fails.
    pub fn handle(&self, request: &InvocationRequest) -> InvocationResponse {
        let result = match request.kind {
            InvocationKind::Invoke => self.invoke(&request.function, &request.args, &request.context),
            InvocationKind::Query => self.query(&request.function, &request.args, &request.context),
        };

        match result {
            Ok(output) => {
                debug!(tx_id = %request.tx_id, function = %request.function, "Invocation succeeded");
                let response = InvocationResponse::success(request.tx_id, output.payload);
                match output.notice {
                    Some(notice) => response.with_notice(notice),
                    None => response,
                }
            }
            Err(err) => {
                warn!(
                    tx_id = %request.tx_id,
                    function = %request.function,
                    kind = %err.kind(),
                    error = %err,
                    "Invocation failed"
                );
                InvocationResponse::failure(request.tx_id, err.kind(), err.to_string())
            }
        }
    }
}
