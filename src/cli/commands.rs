//! CLI command implementations
//!
//! Each command returns `P4StreamError`; `run` turns that into the error
//! report and exit code.

use serde::Serialize;
use serde_json::json;

use p4stream_config::Config;
use p4stream_engine::{
    CommandExecutor, CreateRequest, DeletionPlan, NO_PARENT, P4Cli, PreparedStream, StreamLifecycle, StreamOverride,
    StreamSpec, parse_option_vector, validate_location,
};
use p4stream_utils::error::P4StreamError;

/// Arguments of `p4stream create`.
#[derive(Debug, Clone)]
pub struct CreateArgs {
    pub path: String,
    pub name: String,
    pub kind: String,
    pub parent: String,
    pub populate: bool,
    pub options: Option<String>,
    pub owner: Option<String>,
    pub dry_run: bool,
}

fn lifecycle(config: &Config) -> Result<StreamLifecycle<P4Cli>, P4StreamError> {
    Ok(StreamLifecycle::new(P4Cli::from_config(config)?))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), P4StreamError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Execute `p4stream list`
pub fn execute_list_command(config: &Config, json: bool) -> Result<(), P4StreamError> {
    let streams = lifecycle(config)?.list_streams()?;

    if json {
        return print_json(&streams);
    }
    if streams.is_empty() {
        println!("No streams found");
        return Ok(());
    }
    print!("{}", format_stream_table(&streams));
    Ok(())
}

/// Execute `p4stream show <path>`
pub fn execute_show_command(path: &str, config: &Config, json: bool) -> Result<(), P4StreamError> {
    let stream = lifecycle(config)?.get_stream(path)?;

    if json {
        return print_json(&stream);
    }
    print!("{}", format_stream_detail(&stream));
    Ok(())
}

/// Build the engine request from CLI arguments.
///
/// Overrides are applied in a fixed order: options, then owner.
pub(crate) fn build_create_request(args: &CreateArgs) -> Result<CreateRequest, P4StreamError> {
    let mut request = CreateRequest::new(
        args.path.as_str(),
        args.name.as_str(),
        args.kind.as_str(),
        args.parent.as_str(),
    )
    .populate(args.populate);

    if let Some(options) = &args.options {
        request = request.with_options(parse_option_vector(options)?);
    }
    if let Some(owner) = &args.owner {
        request = request.with_override(StreamOverride::Owner(owner.clone()));
    }
    Ok(request)
}

/// Execute `p4stream create`
pub fn execute_create_command(
    args: &CreateArgs,
    config: &Config,
    json: bool,
) -> Result<(), P4StreamError> {
    let request = build_create_request(args)?;

    if args.dry_run {
        // A known owner means the preview needs no server at all
        let known_owner = config.user().or(args.owner.as_deref());
        let prepared = PreparedStream::prepare_with(&request, || match known_owner {
            Some(owner) => Ok(owner.to_string()),
            None => Ok(P4Cli::from_config(config)?.user()?),
        })?;
        return print_preview(&prepared, json);
    }

    // Reject bad requests before looking for a p4 binary
    request.validate()?;
    let message = lifecycle(config)?.create_stream(&request)?;
    if json {
        return print_json(&json!({ "stream": args.path, "message": message }));
    }
    println!("{message}");
    Ok(())
}

fn print_preview(prepared: &PreparedStream, json: bool) -> Result<(), P4StreamError> {
    if json {
        return print_json(&json!({
            "stream": prepared.spec,
            "document": prepared.document,
            "populate": prepared.populate,
        }));
    }
    print!("{}", prepared.document);
    if prepared.populate {
        println!("\n(would populate {} from {})", prepared.spec.path, prepared.spec.parent);
    }
    Ok(())
}

/// Execute `p4stream delete`
pub fn execute_delete_command(
    path: &str,
    prune: bool,
    dry_run: bool,
    config: &Config,
    json: bool,
) -> Result<(), P4StreamError> {
    // Reject bad paths before looking for a p4 binary
    validate_location(path)?;
    let streams = lifecycle(config)?;

    if dry_run {
        let plan = streams.plan_deletion(path, prune)?;
        if json {
            return print_json(&plan);
        }
        print!("{}", format_plan(&plan));
        return Ok(());
    }

    let message = streams.delete_stream(path, prune)?;
    if json {
        return print_json(&json!({ "stream": path, "message": message }));
    }
    println!("{message}");
    Ok(())
}

/// Execute `p4stream config`
pub fn execute_config_command(config: &Config, json: bool) -> Result<(), P4StreamError> {
    let effective = config.effective_config();

    if json {
        let entries: serde_json::Map<String, serde_json::Value> = effective
            .into_iter()
            .map(|(key, (value, source))| (key, json!({ "value": value, "source": source })))
            .collect();
        return print_json(&entries);
    }

    println!("Effective configuration:");
    for (key, (value, source)) in effective {
        println!("  {key} = {value}  ({source})");
    }
    Ok(())
}

pub(crate) fn format_stream_table(streams: &[StreamSpec]) -> String {
    let headers = ["STREAM", "TYPE", "PARENT", "OWNER", "NAME"];
    let rows: Vec<[&str; 5]> = streams
        .iter()
        .map(|s| {
            [
                s.path.as_str(),
                s.kind.as_str(),
                s.parent.as_str(),
                s.owner.as_str(),
                s.name.as_str(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let format_row = |cells: &[&str; 5]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        format!("{}\n", line.trim_end())
    };

    let mut out = format_row(&headers);
    for row in &rows {
        out.push_str(&format_row(row));
    }
    out
}

pub(crate) fn format_stream_detail(stream: &StreamSpec) -> String {
    let kind = match stream.known_kind() {
        Some(kind) => kind.to_string(),
        None => format!("{} (unrecognised)", stream.kind),
    };
    let parent = if stream.has_parent() {
        stream.parent.as_str()
    } else {
        NO_PARENT
    };
    let mut out = format!(
        "Stream:      {}\nName:        {}\nOwner:       {}\nType:        {kind}\nParent:      {parent}\nOptions:     {}\n",
        stream.path, stream.name, stream.owner, stream.options
    );
    if let Some(update) = &stream.update {
        out.push_str(&format!("Updated:     {update}\n"));
    }
    if !stream.description.is_empty() {
        out.push_str(&format!("Description: {}\n", stream.description));
    }
    if !stream.paths.is_empty() {
        out.push_str("Paths:\n");
        for path in &stream.paths {
            out.push_str(&format!("  {path}\n"));
        }
    }
    out
}

pub(crate) fn format_plan(plan: &DeletionPlan) -> String {
    let mut out = format!(
        "Deleting {} would remove {} shelved change(s), {} workspace(s) and {} unloaded workspace(s)",
        plan.location,
        plan.shelved_changes.len(),
        plan.clients.len(),
        plan.unloaded_clients.len()
    );
    out.push_str(if plan.prune {
        ", and obliterate its files.\n"
    } else {
        ".\n"
    });
    out.push_str("Commands:\n");
    for command in plan.commands() {
        out.push_str(&format!("  {command}\n"));
    }
    out
}
