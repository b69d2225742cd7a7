use glovewire_dispatch::COMPILED;
use serde::Serialize;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct VersionOutput {
    name: &'static str,
    version: &'static str,
    target: &'static str,
    profile: &'static str,
    classes: Vec<&'static str>,
    feedback: Vec<&'static str>,
    capabilities: Capabilities,
}

#[derive(Serialize)]
struct Capabilities {
    classes: u16,
    feedback: u16,
}

pub fn run(args: VersionArgs, format: OutputFormat) -> CliResult<i32> {
    if !args.extended {
        println!("glovewire {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    let out = VersionOutput {
        name: "glovewire",
        version: env!("CARGO_PKG_VERSION"),
        target: option_env!("GLOVEWIRE_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("GLOVEWIRE_BUILD_PROFILE").unwrap_or("unknown"),
        classes: COMPILED.class_names(),
        feedback: COMPILED.feedback_names(),
        capabilities: Capabilities {
            classes: COMPILED.classes,
            feedback: COMPILED.feedback,
        },
    };

    if let OutputFormat::Json = format {
        println!(
            "{}",
            serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(SUCCESS);
    }

    println!("name: {}", out.name);
    println!("version: {}", out.version);
    println!("target: {}", out.target);
    println!("profile: {}", out.profile);
    println!("classes: {}", out.classes.join(", "));
    println!(
        "feedback: {}",
        if out.feedback.is_empty() {
            "none".to_string()
        } else {
            out.feedback.join(", ")
        }
    );
    println!(
        "capabilities: classes=0x{:04X} feedback=0x{:04X}",
        out.capabilities.classes, out.capabilities.feedback
    );

    Ok(SUCCESS)
}
