use anyhow::Result;
use clap::{ArgMatches, Command};

use crate::checks::psi::{self, PsiConfig, StallKind, Window};
use crate::core::Overall;
use crate::platform::{PressureReader, Resource};

use super::{switch_arg, threshold, threshold_arg};

const LEVELS: [(&str, &str); 2] = [("warning", "Warning"), ("critical", "Critical")];

pub fn command() -> Command {
    let mut cmd = Command::new("psi")
        .about("Check the pressure stall information of the linux kernel")
        .long_about(
            "Read the pressure stall information from /proc/pressure and compare it \
             against the given thresholds to identify overload situations.\n\n\
             This does not work on systems where the interface is disabled in the \
             kernel. Adding \"psi=1\" to the kernel cmdline might activate it.",
        );

    for resource in Resource::ALL {
        cmd = cmd.arg(switch_arg_for(resource));
    }

    for resource in Resource::ALL {
        for (level, level_name) in LEVELS {
            let default = if level == "warning" { "@30:100" } else { "@95:100" };
            cmd = cmd.arg(
                threshold_arg(
                    format!("{}-{}-avg", level, resource.key()),
                    format!(
                        "{} threshold for all the pressure/{} values, overridden by the more specific ones",
                        level_name,
                        resource.key()
                    ),
                )
                .default_value(default),
            );
        }
    }

    for resource in Resource::ALL {
        for kind in StallKind::ALL {
            for window in Window::ALL {
                for (level, level_name) in LEVELS {
                    cmd = cmd.arg(threshold_arg(
                        specific_id(level, resource, kind, window),
                        format!(
                            "{} threshold for the pressure/{} {} {} value",
                            level_name,
                            resource.key(),
                            kind,
                            window.key()
                        ),
                    ));
                }
            }
        }
    }
    cmd
}

fn switch_arg_for(resource: Resource) -> clap::Arg {
    match resource {
        Resource::Cpu => switch_arg("include-cpu", "Include CPU values explicitly (by default all are included)"),
        Resource::Io => switch_arg("include-io", "Include IO values explicitly (by default all are included)"),
        Resource::Memory => {
            switch_arg("include-memory", "Include Memory values explicitly (by default all are included)")
        }
    }
}

fn specific_id(level: &str, resource: Resource, kind: StallKind, window: Window) -> String {
    format!("{}-{}-{}-{}", level, resource.key(), kind.key(), window.key())
}

pub fn config(matches: &ArgMatches) -> PsiConfig {
    let mut config = PsiConfig {
        include: Resource::ALL
            .into_iter()
            .filter(|r| matches.get_flag(&format!("include-{}", r.key())))
            .collect(),
        ..Default::default()
    };

    for resource in Resource::ALL {
        let t = config.thresholds_mut(resource);
        t.generic.warn = threshold(matches, &format!("warning-{}-avg", resource.key()));
        t.generic.crit = threshold(matches, &format!("critical-{}-avg", resource.key()));
        for kind in StallKind::ALL {
            for window in Window::ALL {
                let specific = t.specific_mut(kind, window);
                specific.warn = threshold(matches, &specific_id("warning", resource, kind, window));
                specific.crit = threshold(matches, &specific_id("critical", resource, kind, window));
            }
        }
    }
    config
}

pub async fn execute(matches: &ArgMatches) -> Result<Overall> {
    let config = config(matches);
    let overall = tokio::task::spawn_blocking(move || psi::run(&config, &PressureReader::default())).await?;
    Ok(overall)
}
