// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Login handshakes and name encodings of the two firmware dialects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{ProtocolError, ValueError};

const USERNAME_PROMPT: &[u8] = b"Username: ";
const PASSWORD_PROMPT: &[u8] = b"Password: ";
const LOGIN_BANNER: &[u8] = b"Successfully Logged In!";
const LOGIN_REJECTED: &[u8] = b"Invalid Login";

/// Protocol dialect spoken by the device firmware.
///
/// The dialect is configured explicitly; the library never probes for it.
///
/// # Examples
///
/// ```
/// use wattbox_lib::protocol::{Dialect, NameEncoding};
///
/// let dialect: Dialect = "banner".parse().unwrap();
/// assert_eq!(dialect, Dialect::Banner);
/// assert_eq!(dialect.name_encoding(), NameEncoding::Braced);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// The device prompts with `Username: ` and `Password: `.
    /// Outlet names are a flat comma-separated list.
    #[default]
    Prompt,
    /// Credentials are sent unprompted and the device answers with
    /// `Successfully Logged In!`. Outlet names are `{name}` tokens.
    Banner,
}

/// Encoding of the `OutletName` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameEncoding {
    /// `name1,name2,...,nameN`
    Flat,
    /// `{name1},{name2},...,{nameN}`
    Braced,
}

impl Dialect {
    /// Returns the `OutletName` encoding used by this dialect.
    #[must_use]
    pub const fn name_encoding(&self) -> NameEncoding {
        match self {
            Self::Prompt => NameEncoding::Flat,
            Self::Banner => NameEncoding::Braced,
        }
    }

    /// Returns the configuration name of the dialect.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::Banner => "banner",
        }
    }

    /// Performs the login exchange on a freshly opened stream.
    ///
    /// Reads byte by byte so that nothing past the final prompt or banner is
    /// consumed; the remaining stream belongs to the listener.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::HandshakeTruncated` if the stream ends early,
    /// `ProtocolError::AuthenticationFailed` if the device rejects the
    /// credentials, or `ProtocolError::Io` on socket failure.
    pub(crate) async fn handshake<R, W>(
        self,
        reader: &mut R,
        writer: &mut W,
        username: &str,
        password: &str,
    ) -> Result<(), ProtocolError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        match self {
            Self::Prompt => {
                read_until_any(reader, &[USERNAME_PROMPT]).await?;
                write_line(writer, username).await?;
                read_until_any(reader, &[PASSWORD_PROMPT]).await?;
                write_line(writer, password).await?;
            }
            Self::Banner => {
                write_line(writer, username).await?;
                write_line(writer, password).await?;
                let matched = read_until_any(reader, &[LOGIN_BANNER, LOGIN_REJECTED]).await?;
                if matched == 1 {
                    return Err(ProtocolError::AuthenticationFailed);
                }
            }
        }
        tracing::debug!(dialect = %self, "Handshake complete");
        Ok(())
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prompt" => Ok(Self::Prompt),
            "banner" => Ok(Self::Banner),
            _ => Err(ValueError::InvalidDialect(s.to_string())),
        }
    }
}

/// Reads until one of `patterns` has been seen; returns its position.
async fn read_until_any<R>(reader: &mut R, patterns: &[&[u8]]) -> Result<usize, ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    let window_len = patterns.iter().map(|p| p.len()).max().unwrap_or(0);
    let mut window: Vec<u8> = Vec::with_capacity(window_len + 1);

    loop {
        let byte = match reader.read_u8().await {
            Ok(byte) => byte,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                let expected = patterns
                    .first()
                    .map(|p| String::from_utf8_lossy(p).into_owned())
                    .unwrap_or_default();
                return Err(ProtocolError::HandshakeTruncated(expected));
            }
            Err(e) => return Err(e.into()),
        };

        window.push(byte);
        if window.len() > window_len {
            window.remove(0);
        }
        if let Some(found) = patterns.iter().position(|p| window.ends_with(p)) {
            return Ok(found);
        }
    }
}

async fn write_line<W>(writer: &mut W, line: &str) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
