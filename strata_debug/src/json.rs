// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON call-stream exporter.
//!
//! [`export`] writes a [`RecorderBackend`](super::recorder::RecorderBackend)
//! recording to the given writer as a JSON array, one object per dispatched
//! call. The format is stable enough to diff two recordings of the same
//! scene, which is the main use: comparing a direct call stream against an
//! instanced or archived replay.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::DispatchRecord;

/// Exports recorded calls as a JSON array.
///
/// Each call becomes `{"call": name, "args": [...]}` with arguments in
/// dispatch order.
pub fn export(records: &[DispatchRecord], writer: &mut dyn Write) -> io::Result<()> {
    let calls: Vec<Value> = records
        .iter()
        .map(|r| {
            json!({
                "call": r.name,
                "args": r.args,
            })
        })
        .collect();
    serde_json::to_writer_pretty(writer, &calls)?;
    Ok(())
}

/// Like [`export`], but returns the JSON as a `String`.
#[must_use]
pub fn to_string(records: &[DispatchRecord]) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = export(records, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderBackend;
    use strata_core::backend::Backend;
    use strata_core::param::Param;

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderBackend::new();
        rec.world_begin();
        rec.sphere(
            1.0,
            -1.0,
            1.0,
            360.0,
            &vec![Param::strings("label", &["ball"])],
        );
        rec.world_end();

        let mut out = Vec::new();
        export(rec.records(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0]["call"], "world_begin");
        assert_eq!(parsed[1]["call"], "sphere");
        assert_eq!(parsed[1]["args"][0], "1");
        assert_eq!(parsed[1]["args"][4], "label[1]");
        assert_eq!(parsed[2]["call"], "world_end");
    }

    #[test]
    fn export_empty_recording() {
        let rec = RecorderBackend::new();
        let mut out = Vec::new();
        export(rec.records(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }
}
