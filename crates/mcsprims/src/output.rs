use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mcsprims_proto::{DataMessageStanza, McsMessage};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One app data entry. Kept as a list in wire order: keys may repeat.
#[derive(Serialize)]
struct AppDataOutput<'a> {
    key: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct DataMessageOutput<'a> {
    id: Option<&'a str>,
    from: &'a str,
    category: &'a str,
    persistent_id: Option<&'a str>,
    sent: Option<i64>,
    app_data: Vec<AppDataOutput<'a>>,
    raw_data_size: usize,
}

impl<'a> DataMessageOutput<'a> {
    fn new(stanza: &'a DataMessageStanza) -> Self {
        Self {
            id: stanza.id.as_deref(),
            from: &stanza.from,
            category: &stanza.category,
            persistent_id: stanza.persistent_id.as_deref(),
            sent: stanza.sent,
            app_data: stanza
                .app_data
                .iter()
                .map(|entry| AppDataOutput {
                    key: &entry.key,
                    value: &entry.value,
                })
                .collect(),
            raw_data_size: stanza.raw_data.as_ref().map_or(0, Vec::len),
        }
    }
}

pub fn print_data_message(stanza: &DataMessageStanza, format: OutputFormat) {
    let out = DataMessageOutput::new(stanza);
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "FROM", "CATEGORY", "APP DATA"])
                .add_row(vec![
                    out.id.unwrap_or("-").to_string(),
                    out.from.to_string(),
                    out.category.to_string(),
                    format_app_data(&out.app_data),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "id={} from={} category={} data={}",
                out.id.unwrap_or("-"),
                out.from,
                out.category,
                format_app_data(&out.app_data)
            );
        }
        OutputFormat::Raw => {
            if let Some(raw) = &stanza.raw_data {
                print_raw(raw);
            }
        }
    }
}

#[derive(Serialize)]
struct RecordOutput {
    index: usize,
    tag: u8,
    name: &'static str,
    payload_size: usize,
    detail: String,
}

impl RecordOutput {
    fn new(index: usize, payload_size: usize, message: &McsMessage) -> Self {
        Self {
            index,
            tag: message.tag().as_u8(),
            name: message.tag().name(),
            payload_size,
            detail: describe(message),
        }
    }
}

/// Print the records of an offline-decoded stream.
pub fn print_records(records: &[(usize, McsMessage)], format: OutputFormat) {
    let rows: Vec<RecordOutput> = records
        .iter()
        .enumerate()
        .map(|(index, (size, message))| RecordOutput::new(index, *size, message))
        .collect();

    match format {
        OutputFormat::Json => {
            for row in &rows {
                print_json(row);
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "TAG", "NAME", "SIZE", "DETAIL"]);
            for row in &rows {
                table.add_row(vec![
                    row.index.to_string(),
                    row.tag.to_string(),
                    row.name.to_string(),
                    row.payload_size.to_string(),
                    row.detail.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in &rows {
                println!(
                    "#{} tag={} ({}) size={} {}",
                    row.index, row.tag, row.name, row.payload_size, row.detail
                );
            }
        }
        OutputFormat::Raw => {
            for (_, message) in records {
                print_raw(&message.encode_to_vec());
            }
        }
    }
}

fn describe(message: &McsMessage) -> String {
    match message {
        McsMessage::DataMessageStanza(stanza) => {
            serde_json::to_string(&DataMessageOutput::new(stanza)).unwrap_or_default()
        }
        McsMessage::StreamErrorStanza(stanza) => format!(
            "type={} text={}",
            stanza.r#type,
            stanza.text.as_deref().unwrap_or("")
        ),
        other => format!("{other:?}"),
    }
}

fn format_app_data(app_data: &[AppDataOutput<'_>]) -> String {
    app_data
        .iter()
        .map(|entry| format!("{}={}", entry.key, entry.value))
        .collect::<Vec<_>>()
        .join(",")
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
