//! Icinga 2 `CheckCommand` definitions generated from the command tree.

use std::fmt::Write;

use clap::{Arg, ArgAction, Command};

pub const PARENT_COMMAND: &str = "system_basics";
const EXECUTABLE: &str = "check_sysbasics";

// Not useful to configure from Icinga
const SKIPPED_ARGS: [&str; 4] = ["help", "version", "debug", "dump-icinga2-config"];

/// Render one parent object carrying the global flags plus one object per
/// subcommand importing it
pub fn render(cli: &Command) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "object CheckCommand \"{}\" {{", PARENT_COMMAND);
    let _ = writeln!(out, "\tcommand = [ PluginContribDir + \"/{}\" ]", EXECUTABLE);
    let _ = writeln!(out, "\targuments = {{");
    for arg in configurable(cli) {
        write_argument(&mut out, PARENT_COMMAND, arg);
    }
    let _ = writeln!(out, "\t}}");
    let _ = writeln!(out, "}}");

    for sub in cli.get_subcommands() {
        let name = format!("{}_{}", PARENT_COMMAND, sub.get_name());
        let _ = writeln!(out);
        let _ = writeln!(out, "object CheckCommand \"{}\" {{", name);
        let _ = writeln!(out, "\timport \"{}\"", PARENT_COMMAND);
        let _ = writeln!(out, "\targuments += {{");
        let _ = writeln!(out, "\t\t\"{}\" = {{", sub.get_name());
        let _ = writeln!(out, "\t\t\tset_if = true");
        let _ = writeln!(out, "\t\t\torder = -1");
        let _ = writeln!(out, "\t\t}}");
        for arg in configurable(sub).filter(|a| !a.is_global_set()) {
            write_argument(&mut out, &name, arg);
        }
        let _ = writeln!(out, "\t}}");
        let _ = writeln!(out, "}}");
    }
    out
}

fn configurable(cmd: &Command) -> impl Iterator<Item = &Arg> {
    cmd.get_arguments()
        .filter(|a| !SKIPPED_ARGS.contains(&a.get_id().as_str()))
        .filter(|a| a.get_long().is_some())
}

fn write_argument(out: &mut String, prefix: &str, arg: &Arg) {
    let long = arg.get_long().unwrap_or_default();
    let var = format!("{}_{}", prefix, long.replace('-', "_"));

    let _ = writeln!(out, "\t\t\"--{}\" = {{", long);
    match arg.get_action() {
        ArgAction::SetTrue => {
            let _ = writeln!(out, "\t\t\tset_if = \"${}$\"", var);
        }
        ArgAction::Append => {
            let _ = writeln!(out, "\t\t\tvalue = \"${}$\"", var);
            let _ = writeln!(out, "\t\t\trepeat_key = true");
        }
        _ => {
            let _ = writeln!(out, "\t\t\tvalue = \"${}$\"", var);
        }
    }
    if let Some(help) = arg.get_help() {
        let _ = writeln!(out, "\t\t\tdescription = \"{}\"", escape(&help.to_string()));
    }
    let _ = writeln!(out, "\t\t}}");
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
