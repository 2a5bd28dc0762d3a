use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::debug;

use mymess_client::attendance::{AttendanceMark, AttendanceStatus, SelectedMembersAttendance};
use mymess_client::leave::{LeaveRequest, NewLeaveRequest};
use mymess_client::mess::Mess;
use mymess_client::overview::{MemberOverview, NewMember, OwnerOverview};
use mymess_client::user::SubscriptionDuration;
use mymess_client::prelude::*;

#[derive(Parser, Debug)]
#[clap(name = "mymess", version)]
#[clap(about = "Command line client for the MyMess mess management service", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Backend URL. Defaults to MYMESS_API_URL or http://localhost:8080
    #[clap(long)]
    api_url: Option<String>,

    /// Where the session is kept between runs. Defaults to MYMESS_SESSION_FILE
    #[clap(long)]
    session_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Email a one-time sign-in code
    Otp {
        email: String,
        /// Sign in as a mess owner
        #[clap(long)]
        owner: bool,
    },
    /// Sign in with a one-time code
    Verify {
        email: String,
        otp: String,
        #[clap(long)]
        owner: bool,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Subscription, dues, attendance and leave for a month
    Overview {
        #[clap(long)]
        year: Option<i32>,
        /// Month number, 1 to 12
        #[clap(long)]
        month: Option<u32>,
        /// Print the overview as JSON
        #[clap(long)]
        json: bool,
    },
    /// List your leave requests
    Leaves,
    /// Ask for leave between two dates, both included
    ApplyLeave {
        start: NaiveDate,
        end: NaiveDate,
        reason: String,
    },
    /// Withdraw a pending leave request
    CancelLeave { id: String },
    /// Show what you owe your mess
    Dues,
    /// Pay part or all of your dues
    Pay { amount: f64 },
    /// Owner dashboard
    Owner {
        #[clap(long)]
        json: bool,
    },
    /// List your members with what each owes
    Members,
    /// Sign a member up to your mess, registering the account if needed
    AddMember {
        email: String,
        name: String,
        #[clap(long)]
        phone: Option<String>,
        #[clap(long)]
        address: Option<String>,
        /// Subscribe for two months instead of one
        #[clap(long)]
        bimonthly: bool,
        #[clap(long)]
        non_veg: bool,
        /// Password for a newly registered account
        #[clap(long, default_value = "default123")]
        password: String,
    },
    /// Approve a pending leave request
    Approve { id: String },
    /// Reject a pending leave request
    Reject { id: String, reason: String },
    /// Mark attendance for members of your mess
    Mark {
        /// present, absent or leave
        status: AttendanceStatus,
        /// Member emails
        #[clap(required = true)]
        members: Vec<String>,
        /// Day to mark, today when omitted
        #[clap(long)]
        date: Option<NaiveDate>,
    },
}

fn role(owner: bool) -> Role {
    if owner {
        Role::Owner
    } else {
        Role::Member
    }
}

async fn joined_mess(mymess: &MyMess, email: &str) -> anyhow::Result<Mess> {
    let user = mymess.users().get_by_email(email).await?;
    let mess_id = user
        .joined_mess()
        .context("You have not joined a mess yet")?;
    Ok(mymess.messes().get_by_id(mess_id).await?)
}

async fn fetch_leave(mymess: &MyMess, id: &str) -> anyhow::Result<LeaveRequest> {
    mymess
        .leaves()
        .get(id)
        .await
        .with_context(|| format!("Failed to fetch leave request {}", id))
}

fn print_member(overview: &MemberOverview) {
    println!("{} ({})", overview.mess.display_name(), overview.month);
    println!(
        "  subscription  {} to {} ({} days)",
        overview.period.start, overview.period.end, overview.period.days
    );
    println!(
        "  dues          {:.2} ({:?})",
        overview.pending_dues, overview.dues_source
    );
    let a = &overview.attendance;
    println!(
        "  attendance    {} present, {} absent, {} leave of {} days ({:.1}%)",
        a.present,
        a.absent,
        a.leave,
        a.total,
        a.percentage()
    );
    let l = &overview.leave_statistics;
    println!(
        "  leave         {} days this month, {} of {} left ({} approved, {} pending, {} rejected)",
        l.days_this_month, l.remaining, l.quota, l.approved, l.pending, l.rejected
    );
}

fn print_owner(overview: &OwnerOverview) {
    println!("{}", overview.mess.display_name());
    println!("  members         {}", overview.member_count);
    println!(
        "  pending dues    {:.2} ({:?})",
        overview.total_pending_dues, overview.dues_source
    );
    println!("  marked today    {}", overview.todays_attendance.len());
    println!("  pending leaves  {}", overview.pending_leaves.len());
    for leave in &overview.pending_leaves {
        print_leave(leave);
    }
}

fn print_leave(leave: &LeaveRequest) {
    println!(
        "    {}  {} to {}  {:<8}  {}  {}",
        leave.id,
        leave.start_date,
        leave.end_date,
        leave.status().to_string(),
        leave.user_email,
        leave.reason
    );
}

async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut options = ClientOptions::from_env()?;
    if let Some(url) = &cli.api_url {
        options = options.with_base_url(url);
    }
    if cli.session_file.is_some() {
        options = options.with_session_path(cli.session_file.clone());
    }
    debug!("using backend {}", options.base_url);

    let mymess = MyMess::new_with_options(options)?;
    let today = Local::now().date_naive();

    if let Some(session) = mymess.auth().restore().await? {
        debug!("restored session for {}", session.email);
    }
    let session = || -> anyhow::Result<Session> { Ok(mymess.auth().require_session()?) };

    match cli.command {
        Commands::Otp { email, owner } => {
            let reply = mymess.auth().send_otp(role(owner), &email).await?;
            println!("{}", reply);
        }
        Commands::Verify { email, otp, owner } => {
            let session = mymess.auth().verify_otp(role(owner), &email, &otp).await?;
            println!("Signed in as {} ({})", session.email, session.role);
        }
        Commands::Logout => {
            mymess.auth().sign_out().await?;
            println!("Signed out");
        }
        Commands::Whoami => match mymess.auth().get_session() {
            Some(session) => println!("{} ({})", session.email, session.role),
            None => println!("Not signed in"),
        },
        Commands::Overview { year, month, json } => {
            let email = session()?.email;
            let target = match (year, month) {
                (None, None) => Month::of(today),
                (year, month) => Month::new(
                    year.unwrap_or_else(|| Month::of(today).year()),
                    month.unwrap_or_else(|| Month::of(today).month()),
                )?,
            };
            let overview = mymess.overview().member(&email, target, today).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                print_member(&overview);
            }
        }
        Commands::Leaves => {
            let email = session()?.email;
            for leave in mymess.leaves().for_user(&email).await? {
                print_leave(&leave);
            }
        }
        Commands::ApplyLeave { start, end, reason } => {
            let email = session()?.email;
            let mess = joined_mess(&mymess, &email).await?;
            let request = NewLeaveRequest {
                user_email: email,
                mess_id: mess.id.clone(),
                owner_email: mess.email.clone(),
                mess_name: mess.mess_name.clone(),
                start_date: start,
                end_date: end,
                reason,
                application_date: Some(today),
            };
            let leave = mymess.leaves().apply(&request, today).await?;
            println!("Leave request {} submitted", leave.id);
        }
        Commands::CancelLeave { id } => {
            let leave = fetch_leave(&mymess, &id).await?;
            mymess.leaves().cancel(&leave).await?;
            println!("Leave request {} cancelled", id);
        }
        Commands::Dues => {
            let email = session()?.email;
            let mess = joined_mess(&mymess, &email).await?;
            let (dues, source) = mymess.overview().member_dues(&email, &mess).await;
            println!("{:.2} owed to {} ({:?})", dues, mess.display_name(), source);
        }
        Commands::Pay { amount } => {
            let email = session()?.email;
            let mess = joined_mess(&mymess, &email).await?;
            let (outstanding, _) = mymess.overview().member_dues(&email, &mess).await;
            let payment = mymess
                .payments()
                .pay(&email, &mess.email, &mess.id, outstanding, amount)
                .await?;
            println!(
                "Paid {:.2}, {:.2} still due",
                payment.amount_paid, payment.remaining_dues
            );
        }
        Commands::Owner { json } => {
            let email = session()?.email;
            let overview = mymess.overview().owner(&email, today).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                print_owner(&overview);
            }
        }
        Commands::Members => {
            let email = session()?.email;
            for entry in mymess.overview().roster(&email).await? {
                println!(
                    "    {:<30}  {:<20}  {:>10.2}  {:?}",
                    entry.user.email.as_deref().unwrap_or("-"),
                    entry.user.name.as_deref().unwrap_or("Unknown Member"),
                    entry.pending_dues,
                    entry.dues_source
                );
            }
        }
        Commands::AddMember {
            email,
            name,
            phone,
            address,
            bimonthly,
            non_veg,
            password,
        } => {
            let owner_email = session()?.email;
            let member = NewMember {
                name,
                email,
                phone_number: phone,
                address,
                duration: if bimonthly {
                    SubscriptionDuration::TwoMonths
                } else {
                    SubscriptionDuration::OneMonth
                },
                food_type: if non_veg { "Non-Veg" } else { "Veg" }.to_string(),
                initial_password: password,
            };
            let added = mymess.overview().add_member(&owner_email, &member, today).await?;
            if added.registered {
                println!("Registered {}", member.email);
            }
            println!("{} added with {:.2} due", member.email, added.initial_dues);
            if !added.payment_recorded {
                println!("Opening dues could not be recorded");
            }
        }
        Commands::Approve { id } => {
            let leave = fetch_leave(&mymess, &id).await?;
            let leave = mymess.leaves().approve(&leave).await?;
            println!("Leave request {} is {}", leave.id, leave.status());
        }
        Commands::Reject { id, reason } => {
            let leave = fetch_leave(&mymess, &id).await?;
            let leave = mymess.leaves().reject(&leave, &reason).await?;
            println!("Leave request {} is {}", leave.id, leave.status());
        }
        Commands::Mark {
            status,
            members,
            date,
        } => {
            let owner_email = session()?.email;
            let date = date.unwrap_or(today);
            if let [member] = members.as_slice() {
                let mark = AttendanceMark {
                    user_email: member.clone(),
                    date,
                    status,
                };
                mymess.attendance().mark(&owner_email, &[mark]).await?;
            } else {
                let request = SelectedMembersAttendance {
                    owner_email,
                    user_emails: members.clone(),
                    date,
                    status,
                };
                mymess.attendance().mark_selected(&request).await?;
            }
            println!("Marked {} member(s) {} on {}", members.len(), status, date);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
