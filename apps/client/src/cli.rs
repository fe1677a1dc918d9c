use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "resume-client", version)]
#[command(about = "Generate, tailor, render and export AI-written resumes")]
#[command(
    long_about = "Generate, tailor, render and export AI-written resumes.\n\n\
    Talks to the resume backend configured by RESUME_API_URL / RESUME_BUILD_MODE."
)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Backend
    // ─────────────────────────────────────────────────────────────────────────
    /// Check whether the resume backend is reachable
    Health,

    // ─────────────────────────────────────────────────────────────────────────
    // Generation
    // ─────────────────────────────────────────────────────────────────────────
    /// Generate a resume from a free-text profile
    #[command(after_help = "Examples:\n  \
        resume-client generate --profile @me.txt --pdf          Save <name>.pdf\n  \
        resume-client generate --profile \"Jane, Rust dev\" --json  Print the resume JSON")]
    Generate {
        /// Profile text, or @FILE to read it from a file
        #[arg(long, short)]
        profile: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate a resume tailored to a job description
    #[command(after_help = "Examples:\n  \
        resume-client tailor --profile @me.txt --job-file job.txt --pdf\n  \
        resume-client tailor -p @me.txt --job \"Senior Rust Engineer\" --print")]
    Tailor {
        /// Profile text, or @FILE to read it from a file
        #[arg(long, short)]
        profile: String,

        /// Job description text
        #[arg(long, short, conflicts_with = "job_file", required_unless_present = "job_file")]
        job: Option<String>,

        /// Job description upload (.txt, at most 1MB)
        #[arg(long)]
        job_file: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Offline
    // ─────────────────────────────────────────────────────────────────────────
    /// Render a previously saved response without calling the backend
    Render {
        /// JSON file holding a generation response
        #[arg(long, short)]
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Directory for the PDF download
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Save the resume as <full name>.pdf
    #[arg(long)]
    pub pdf: bool,

    /// Write the rendered resume as an HTML page
    #[arg(long, value_name = "PATH")]
    pub html: Option<PathBuf>,

    /// Open the resume in the browser's print dialog
    #[arg(long)]
    pub print: bool,

    /// Print the normalized resume as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Send the resume as a WhatsApp message to this number (+<country><number>)
    #[arg(long, value_name = "PHONE")]
    pub whatsapp: Option<String>,
}

impl OutputArgs {
    /// True when no output was asked for; the resume is then printed as text.
    pub fn is_empty(&self) -> bool {
        !self.json && !self.pdf && !self.print && self.html.is_none() && self.whatsapp.is_none()
    }
}
