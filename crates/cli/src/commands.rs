use std::sync::Arc;

use anyhow::anyhow;
use serde::Serialize;
use wellnest_client::error::{user_message, ApiResult};
use wellnest_client::storage::FileStorage;
use wellnest_client::{ClientConfig, SessionStore, WellnestApi};
use wellnest_core::models::auth::LoginRequest;
use wellnest_core::models::profile::FitnessProfile;
use wellnest_core::models::report::CreateReportRequest;
use wellnest_core::routes::{guard, RouteDecision};
use wellnest_core::session::Session;

use crate::cli::{
    AdminCommand, Credentials, FitnessArgs, ProfileCommand, ReportsCommand, TrainersCommand,
};
use crate::interactive::Prompt;

/// Everything a command needs: configuration, the API client and the
/// restored session store.
pub struct Context {
    pub config: ClientConfig,
    pub api: Arc<WellnestApi>,
    pub store: Arc<SessionStore>,
}

impl Context {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let api = Arc::new(WellnestApi::from_config(&config)?);
        let storage = FileStorage::new(&config.session_file);
        let store = Arc::new(SessionStore::new(api.clone(), Box::new(storage)));
        store.restore_from_storage();

        tracing::debug!(
            api_url = %config.api_url,
            session_file = %config.session_file.display(),
            "Client ready"
        );
        Ok(Self { config, api, store })
    }

    fn session(&self) -> anyhow::Result<Session> {
        self.store
            .session()
            .ok_or_else(|| anyhow!("Not logged in. Run `wellnest login` first."))
    }

    /// Turn an API failure into the message shown to the user, signing out
    /// when the server no longer accepts the stored credential.
    fn check<T>(&self, result: ApiResult<T>) -> anyhow::Result<T> {
        result.map_err(|e| {
            if self.store.handle_api_error(&e) {
                anyhow!("Your session has expired. Please log in again.")
            } else {
                anyhow!(user_message(&e))
            }
        })
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn password_or_prompt(
    password: Option<String>,
    prompt: &mut Prompt,
) -> anyhow::Result<String> {
    match password {
        Some(p) => Ok(p),
        None => prompt.ask("Password: ").await,
    }
}

// ---- session ----

pub async fn login(ctx: &Context, creds: Credentials, prompt: &mut Prompt) -> anyhow::Result<()> {
    let password = password_or_prompt(creds.password, prompt).await?;
    let session = ctx
        .store
        .login(&LoginRequest::new(creds.username, password))
        .await?;
    println!("Signed in as {} ({}).", session.username, session.role);
    Ok(())
}

pub async fn admin_login(
    ctx: &Context,
    creds: Credentials,
    prompt: &mut Prompt,
) -> anyhow::Result<()> {
    let password = password_or_prompt(creds.password, prompt).await?;
    let session = ctx
        .store
        .admin_login(&LoginRequest::new(creds.username, password))
        .await?;
    println!("Signed in to the admin portal as {}.", session.username);
    Ok(())
}

pub fn logout(ctx: &Context) {
    ctx.store.logout();
    println!("Signed out.");
}

pub fn whoami(ctx: &Context) {
    match ctx.store.session() {
        Some(s) => println!("{} <{}> {} ({})", s.full_name, s.email, s.username, s.role),
        None => println!("Not logged in."),
    }
}

pub fn route(ctx: &Context, path: &str) {
    match guard(path, &ctx.store.state()) {
        RouteDecision::Loading => println!("loading"),
        RouteDecision::Render(page) => println!("render {}", page.path()),
        RouteDecision::Redirect(page) => println!("redirect {}", page.path()),
    }
}

// ---- trainers ----

pub async fn trainers(ctx: &Context, command: TrainersCommand) -> anyhow::Result<()> {
    let session = ctx.session()?;
    let api = ctx.api.authorized(&session);
    match command {
        TrainersCommand::List => print_json(&ctx.check(api.list_trainers().await)?),
        TrainersCommand::Select { trainer_id } => {
            println!("{}", ctx.check(api.select_trainer(&trainer_id).await)?);
            Ok(())
        }
        TrainersCommand::Trainees => print_json(&ctx.check(api.my_trainees().await)?),
        TrainersCommand::Today => match ctx.check(api.my_trainer_today().await)? {
            Some(trainer) => print_json(&trainer),
            None => {
                println!("No trainer selected for today.");
                Ok(())
            }
        },
    }
}

// ---- profile ----

pub async fn profile(ctx: &Context, command: ProfileCommand) -> anyhow::Result<()> {
    let session = ctx.session()?;
    let api = ctx.api.authorized(&session);
    match command {
        ProfileCommand::Show => print_json(&ctx.check(api.profile().await)?),
        ProfileCommand::SetFitness(args) => {
            let profile = fitness_profile(args);
            print_json(&ctx.check(api.save_fitness_profile(&profile).await)?)
        }
    }
}

fn fitness_profile(args: FitnessArgs) -> FitnessProfile {
    FitnessProfile {
        id: None,
        age: args.age,
        weight: args.weight,
        height: args.height,
        gender: args.gender,
        fitness_goal: args.goal,
        activity_level: args.activity_level,
        medical_notes: args.medical_notes,
    }
}

// ---- reports ----

pub async fn reports(ctx: &Context, command: ReportsCommand) -> anyhow::Result<()> {
    let session = ctx.session()?;
    let api = ctx.api.authorized(&session);
    match command {
        ReportsCommand::Create {
            trainer_id,
            message,
        } => {
            let request = CreateReportRequest::new(&trainer_id, &message)?;
            print_json(&ctx.check(api.create_report(&request).await)?)
        }
        ReportsCommand::Mine => print_json(&ctx.check(api.my_reports().await)?),
        ReportsCommand::All => print_json(&ctx.check(api.all_reports().await)?),
        ReportsCommand::Pending => print_json(&ctx.check(api.pending_reports().await)?),
        ReportsCommand::ByTrainer { trainer_id } => {
            print_json(&ctx.check(api.reports_by_trainer(&trainer_id).await)?)
        }
        ReportsCommand::SetStatus { report_id, status } => {
            print_json(&ctx.check(api.update_report_status(&report_id, status).await)?)
        }
        ReportsCommand::Delete { report_id } => {
            println!("{}", ctx.check(api.delete_report(&report_id).await)?);
            Ok(())
        }
    }
}

// ---- admin ----

pub async fn admin(ctx: &Context, command: AdminCommand) -> anyhow::Result<()> {
    let session = ctx.session()?;
    if !session.is_admin() {
        anyhow::bail!("Access denied. Admin credentials required.");
    }
    let api = ctx.api.authorized(&session);
    match command {
        AdminCommand::Stats => print_json(&ctx.check(api.admin_stats().await)?),
        AdminCommand::Customers => print_json(&ctx.check(api.customers().await)?),
        AdminCommand::Trainers => print_json(&ctx.check(api.trainer_accounts().await)?),
        AdminCommand::DeleteUser { user_id } => {
            println!("{}", ctx.check(api.delete_user(&user_id).await)?);
            Ok(())
        }
    }
}
