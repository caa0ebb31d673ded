// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Listener task reading lines pushed by the device.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;

use crate::error::ParseError;
use crate::protocol::{Connection, ConnectionHandler, Dialect, Response, parse_line};

/// Reads the session of `generation` until the device goes away.
pub(crate) async fn run(
    mut reader: BufReader<OwnedReadHalf>,
    connection: Arc<Connection>,
    generation: u64,
) {
    let dialect = connection.config().dialect();
    read_lines(&mut reader, connection.handler(), dialect).await;
    connection.listener_finished(generation).await;
}

/// Feeds every line to `handler` until end of stream or a read error.
async fn read_lines<R>(reader: &mut R, handler: &dyn ConnectionHandler, dialect: Dialect)
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                tracing::debug!("Device closed the stream");
                return;
            }
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\r', '\n']);
                if !line.trim().is_empty() {
                    handle_line(line, handler, dialect);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Read from device failed");
                return;
            }
        }
    }
}

fn handle_line(line: &str, handler: &dyn ConnectionHandler, dialect: Dialect) {
    tracing::debug!(line, "Received line");
    match parse_line(line, dialect) {
        Ok(Response::Ack) => tracing::debug!("Command acknowledged"),
        Ok(Response::Nack(reason)) => tracing::warn!(%reason, "Command rejected by device"),
        Ok(Response::Value(change)) => handler.on_change(&change),
        Err(ParseError::UnexpectedFormat(_)) => {
            tracing::debug!(line, "Ignoring unrecognized line");
        }
        Err(e) => tracing::warn!(line, error = %e, "Discarding malformed line"),
    }
}
