use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use wellnest_core::models::report::ReportStatus;

#[derive(Parser, Debug)]
#[command(name = "wellnest", author, version, about = "WellNest fitness coaching client")]
pub struct Cli {
    /// API root, overriding `WELLNEST_API_URL`.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session file, overriding `WELLNEST_SESSION_FILE`.
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with a username or email address.
    Login(Credentials),
    /// Sign in through the admin portal.
    AdminLogin(Credentials),
    /// Forget the stored session.
    Logout,
    /// Show who is signed in.
    Whoami,
    /// Create an account and verify the emailed code.
    Register(RegisterArgs),
    /// Reset a forgotten password with an emailed code.
    ForgotPassword {
        email: String,
    },
    /// Show what the client would render for a path.
    Route {
        path: String,
    },
    #[command(subcommand)]
    Trainers(TrainersCommand),
    #[command(subcommand)]
    Profile(ProfileCommand),
    #[command(subcommand)]
    Reports(ReportsCommand),
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Args, Debug)]
pub struct Credentials {
    /// Username or email address.
    pub username: String,

    /// Read from standard input when omitted.
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub full_name: String,

    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    /// Register as a trainer instead of a customer.
    #[arg(long)]
    pub trainer: bool,
}

#[derive(Subcommand, Debug)]
pub enum TrainersCommand {
    /// List trainers available for selection.
    List,
    /// Choose today's trainer.
    Select { trainer_id: String },
    /// Trainees assigned to you (trainers only).
    Trainees,
    /// The trainer you chose for today.
    Today,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    Show,
    /// Create or replace your fitness profile.
    SetFitness(FitnessArgs),
}

#[derive(Args, Debug)]
pub struct FitnessArgs {
    #[arg(long)]
    pub age: Option<u32>,
    /// Kilograms.
    #[arg(long)]
    pub weight: Option<f64>,
    /// Centimetres.
    #[arg(long)]
    pub height: Option<f64>,
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub goal: Option<String>,
    #[arg(long)]
    pub activity_level: Option<String>,
    #[arg(long)]
    pub medical_notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ReportsCommand {
    /// Report a problem with a trainer.
    Create { trainer_id: String, message: String },
    /// Reports you filed.
    Mine,
    All,
    Pending,
    ByTrainer { trainer_id: String },
    SetStatus {
        report_id: String,
        /// PENDING, REVIEWED, RESOLVED or DISMISSED.
        #[arg(value_parser = parse_status)]
        status: ReportStatus,
    },
    Delete { report_id: String },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    Stats,
    Customers,
    Trainers,
    DeleteUser { user_id: String },
}

fn parse_status(raw: &str) -> Result<ReportStatus, String> {
    ReportStatus::from_str_wire(raw).map_err(|e| e.message().to_string())
}
