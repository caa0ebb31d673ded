// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for lines received from the device.
//!
//! Every inbound line is one of:
//!
//! - `OK` - positive acknowledgement
//! - `#...` - negative acknowledgement, e.g. `#Error`
//! - `?Method=Value` or `~Method=Value` - a value line
//!
//! Anything else is rejected with [`ParseError::UnexpectedFormat`].

use crate::error::ParseError;
use crate::protocol::{Dialect, NameEncoding};
use crate::state::{ChangeKind, StateChange};
use crate::types::Method;

/// A classified inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `OK`
    Ack,
    /// `#...`, carrying the text after the marker.
    Nack(String),
    /// A value line and its interpretation.
    Value(StateChange),
}

/// Parses one line, without its terminator.
///
/// The dialect selects the encoding of `OutletName` values.
///
/// # Errors
///
/// Returns `ParseError::UnexpectedFormat` for lines matching no grammar, and
/// `ParseError::InvalidValue` for value lines whose value is malformed.
///
/// # Examples
///
/// ```
/// use wattbox_lib::protocol::{parse_line, Dialect, Response};
/// use wattbox_lib::state::ChangeKind;
///
/// let Response::Value(change) = parse_line("?OutletStatus=1,0,1", Dialect::Prompt).unwrap() else {
///     panic!("expected a value line");
/// };
/// assert_eq!(change.kind(), &ChangeKind::OutletStatus(vec![true, false, true]));
///
/// assert_eq!(parse_line("OK", Dialect::Banner).unwrap(), Response::Ack);
/// ```
pub fn parse_line(line: &str, dialect: Dialect) -> Result<Response, ParseError> {
    if line == "OK" {
        return Ok(Response::Ack);
    }
    if let Some(reason) = line.strip_prefix('#') {
        return Ok(Response::Nack(reason.to_string()));
    }

    let (name, value) = line
        .strip_prefix(['?', '~'])
        .and_then(|rest| rest.split_once('='))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| ParseError::UnexpectedFormat(line.to_string()))?;

    let method = Method::from(name);
    let kind = match &method {
        Method::Model => ChangeKind::Model(value.to_string()),
        Method::Serial => ChangeKind::Serial(value.to_string()),
        Method::OutletCount => ChangeKind::OutletCount(parse_count(value)?),
        Method::OutletName => ChangeKind::OutletNames(match dialect.name_encoding() {
            NameEncoding::Flat => parse_flat_names(value),
            NameEncoding::Braced => parse_braced_names(value)?,
        }),
        Method::OutletStatus => ChangeKind::OutletStatus(parse_status(value)?),
        _ => ChangeKind::Stored,
    };

    Ok(Response::Value(StateChange::new(method, value, kind)))
}

fn parse_count(value: &str) -> Result<usize, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|e| ParseError::invalid("OutletCount", format!("{value:?}: {e}")))
}

fn parse_flat_names(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(ToString::to_string).collect()
}

/// Peels `{name}` tokens separated by commas until the value is exhausted.
fn parse_braced_names(value: &str) -> Result<Vec<String>, ParseError> {
    let mut names = Vec::new();
    let mut rest = value;

    while !rest.is_empty() {
        let inner = rest
            .strip_prefix('{')
            .ok_or_else(|| ParseError::invalid("OutletName", format!("expected '{{' in {value:?}")))?;
        let (name, after) = inner
            .split_once('}')
            .ok_or_else(|| ParseError::invalid("OutletName", format!("unclosed '{{' in {value:?}")))?;
        names.push(name.to_string());

        rest = match after.strip_prefix(',') {
            Some(next) if next.is_empty() => {
                return Err(ParseError::invalid(
                    "OutletName",
                    format!("trailing ',' in {value:?}"),
                ));
            }
            Some(next) => next,
            None if after.is_empty() => after,
            None => {
                return Err(ParseError::invalid(
                    "OutletName",
                    format!("unexpected text {after:?} after name"),
                ));
            }
        };
    }

    Ok(names)
}

fn parse_status(value: &str) -> Result<Vec<bool>, ParseError> {
    if value.is_empty() {
        return Err(ParseError::invalid("OutletStatus", "empty status list"));
    }
    value
        .split(',')
        .map(|token| match token.trim() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(ParseError::invalid(
                "OutletStatus",
                format!("invalid state token {other:?}"),
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(line: &str, dialect: Dialect) -> StateChange {
        match parse_line(line, dialect).unwrap() {
            Response::Value(change) => change,
            other => panic!("expected value line, got {other:?}"),
        }
    }

    #[test]
    fn parse_acknowledgements() {
        assert_eq!(parse_line("OK", Dialect::Prompt).unwrap(), Response::Ack);
        assert_eq!(
            parse_line("#Error", Dialect::Prompt).unwrap(),
            Response::Nack("Error".to_string())
        );
        assert_eq!(
            parse_line("#", Dialect::Banner).unwrap(),
            Response::Nack(String::new())
        );
    }

    #[test]
    fn parse_value_markers() {
        let query = value("?Model=WB-800-IPVM-12", Dialect::Prompt);
        let push = value("~Model=WB-800-IPVM-12", Dialect::Banner);
        assert_eq!(query, push);
        assert_eq!(query.kind(), &ChangeKind::Model("WB-800-IPVM-12".to_string()));
    }

    #[test]
    fn parse_serial() {
        let change = value("?Serial=ST191500681E8422", Dialect::Prompt);
        assert_eq!(change.method(), &Method::Serial);
        assert_eq!(
            change.kind(),
            &ChangeKind::Serial("ST191500681E8422".to_string())
        );
    }

    #[test]
    fn parse_outlet_count() {
        let change = value("?OutletCount=12", Dialect::Prompt);
        assert_eq!(change.kind(), &ChangeKind::OutletCount(12));
        assert_eq!(change.raw(), "12");
    }

    #[test]
    fn parse_outlet_count_invalid() {
        let err = parse_line("?OutletCount=twelve", Dialect::Prompt).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { ref field, .. } if field == "OutletCount"));
    }

    #[test]
    fn parse_braced_outlet_names() {
        let change = value("?OutletName={Garage},{Office},{Lab}", Dialect::Banner);
        assert_eq!(
            change.kind(),
            &ChangeKind::OutletNames(vec![
                "Garage".to_string(),
                "Office".to_string(),
                "Lab".to_string()
            ])
        );
    }

    #[test]
    fn parse_braced_names_keep_commas_and_spaces() {
        let names = parse_braced_names("{Rack, Top},{ Amp }").unwrap();
        assert_eq!(names, ["Rack, Top", " Amp "]);
    }

    #[test]
    fn parse_braced_names_empty_value() {
        assert!(parse_braced_names("").unwrap().is_empty());
        assert_eq!(parse_braced_names("{}").unwrap(), [""]);
    }

    #[test]
    fn parse_braced_names_malformed() {
        for bad in ["Garage,Office", "{Garage", "{Garage}x", "{Garage},", "{A}{B}"] {
            assert!(parse_braced_names(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn parse_flat_outlet_names() {
        let change = value("?OutletName=Garage,Office,Lab", Dialect::Prompt);
        assert_eq!(
            change.kind(),
            &ChangeKind::OutletNames(vec![
                "Garage".to_string(),
                "Office".to_string(),
                "Lab".to_string()
            ])
        );
    }

    #[test]
    fn parse_flat_names_keep_spaces() {
        assert_eq!(parse_flat_names("Rack Top, Amp ,TV"), ["Rack Top", " Amp ", "TV"]);
        assert!(parse_flat_names("").is_empty());
    }

    #[test]
    fn parse_outlet_status() {
        let change = value("~OutletStatus=1,0,1", Dialect::Banner);
        assert_eq!(
            change.kind(),
            &ChangeKind::OutletStatus(vec![true, false, true])
        );
    }

    #[test]
    fn parse_outlet_status_malformed() {
        for bad in ["?OutletStatus=", "?OutletStatus=1,2", "?OutletStatus=on,off", "?OutletStatus=1,,0"] {
            assert!(
                matches!(
                    parse_line(bad, Dialect::Prompt),
                    Err(ParseError::InvalidValue { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_other_method_is_stored() {
        let change = value("?Firmware=2.4.0.0", Dialect::Prompt);
        assert_eq!(change.method(), &Method::Firmware);
        assert_eq!(change.kind(), &ChangeKind::Stored);

        let change = value("~UPSStatus=100,0,Good", Dialect::Banner);
        assert_eq!(change.method().as_str(), "UPSStatus");
        assert_eq!(change.raw(), "100,0,Good");
    }

    #[test]
    fn parse_value_may_contain_equals() {
        let change = value("?Hostname=a=b", Dialect::Prompt);
        assert_eq!(change.raw(), "a=b");
    }

    #[test]
    fn parse_unrecognized_lines() {
        for bad in ["", "hello", "Model=X", "?Model", "?=x", "!OutletSet=1,ON", "Username: "] {
            assert!(
                matches!(
                    parse_line(bad, Dialect::Prompt),
                    Err(ParseError::UnexpectedFormat(_))
                ),
                "{bad:?} should be unrecognized"
            );
        }
    }
}
