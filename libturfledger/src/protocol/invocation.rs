// Copyright 2021 Cargill Incorporated
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Contract invocation requests and responses.

use serde::Serialize;

use crate::handler::ApplyError;

/// An entry point name and its string arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    function: String,
    args: Vec<String>,
}

impl InvocationRequest {
    /// Splits a raw argument list into the entry point name and its arguments.
    pub fn from_args(args: &[String]) -> Result<Self, ApplyError> {
        let (function, rest) = args.split_first().ok_or_else(|| {
            ApplyError::InvalidArgument("no entry point name given".to_string())
        })?;
        Ok(InvocationRequest {
            function: function.clone(),
            args: rest.to_vec(),
        })
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Fails unless between `min` and `max` arguments were given.
    pub fn expect_args(&self, min: usize, max: usize) -> Result<(), ApplyError> {
        if self.args.len() < min || self.args.len() > max {
            let expected = if min == max {
                min.to_string()
            } else {
                format!("{} to {}", min, max)
            };
            return Err(ApplyError::InvalidArgument(format!(
                "{} expects {} arguments, got {}",
                self.function,
                expected,
                self.args.len()
            )));
        }
        Ok(())
    }

    pub fn arg(&self, index: usize, name: &str) -> Result<&str, ApplyError> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| {
                ApplyError::InvalidArgument(format!("{}: missing argument {}", self.function, name))
            })
    }

    pub fn optional_arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn f32_arg(&self, index: usize, name: &str) -> Result<f32, ApplyError> {
        let raw = self.arg(index, name)?;
        raw.trim().parse::<f32>().map_err(|err| {
            ApplyError::InvalidArgument(format!(
                "{}: {} is not a number ({}): {}",
                self.function, name, raw, err
            ))
        })
    }
}

/// The outcome of a contract invocation, as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResponse {
    status: u16,
    payload: Vec<u8>,
}

impl InvocationResponse {
    pub const OK: u16 = 200;
    pub const BAD_REQUEST: u16 = 400;
    pub const ERROR: u16 = 500;

    pub fn success(payload: Vec<u8>) -> Self {
        InvocationResponse {
            status: Self::OK,
            payload,
        }
    }

    /// Maps a contract failure to a status: environment failures are internal errors, the rest
    /// are client errors. The error message becomes the payload.
    pub fn from_error(err: &ApplyError) -> Self {
        InvocationResponse {
            status: if err.is_internal() {
                Self::ERROR
            } else {
                Self::BAD_REQUEST
            },
            payload: err.to_string().into_bytes(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    pub fn is_success(&self) -> bool {
        self.status == Self::OK
    }

    pub fn payload_lossy(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Renders a float the way it crosses an invocation boundary: fixed point, six decimals.
pub fn format_decimal(value: f32) -> String {
    format!("{:.6}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_function_name() {
        let request = InvocationRequest::from_args(&args(&["ReadSLA", "sla-1"])).unwrap();

        assert_eq!("ReadSLA", request.function());
        assert_eq!("sla-1", request.arg(0, "id").unwrap());
        assert!(request.optional_arg(1).is_none());
    }

    #[test]
    fn empty_args_are_rejected() {
        match InvocationRequest::from_args(&[]) {
            Err(ApplyError::InvalidArgument(_)) => (),
            res => panic!("Expected InvalidArgument, got {:?}", res),
        }
    }

    #[test]
    fn arity_is_checked() {
        let request = InvocationRequest::from_args(&args(&["DeleteSLA"])).unwrap();

        assert!(request.expect_args(0, 0).is_ok());
        assert!(request.expect_args(1, 1).is_err());
    }

    #[test]
    fn six_decimal_floats_round_trip() {
        assert_eq!("5.000000", format_decimal(5.0));
        assert_eq!("2.500000", format_decimal(2.5));

        let rendered = format_decimal(0.1);
        assert_eq!("0.100000", rendered);
        let request =
            InvocationRequest::from_args(&args(&["UpdateTargetGrassLength", "x", &rendered]))
                .unwrap();
        assert_eq!(0.1f32, request.f32_arg(1, "target").unwrap());
    }

    #[test]
    fn non_numeric_float_is_invalid() {
        let request = InvocationRequest::from_args(&args(&["F", "tall"])).unwrap();

        match request.f32_arg(0, "target") {
            Err(ApplyError::InvalidArgument(_)) => (),
            res => panic!("Expected InvalidArgument, got {:?}", res),
        }
    }

    #[test]
    fn error_status_follows_error_kind() {
        let client = InvocationResponse::from_error(&ApplyError::NotFound("sla-1".into()));
        let internal =
            InvocationResponse::from_error(&ApplyError::ExternalLookupFailed("down".into()));

        assert_eq!(InvocationResponse::BAD_REQUEST, client.status());
        assert_eq!("NotFound: sla-1", client.payload_lossy());
        assert_eq!(InvocationResponse::ERROR, internal.status());
        assert!(!internal.is_success());
    }
}
