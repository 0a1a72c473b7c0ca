use std::io::{self, BufRead, Write};

use clap::Parser;

use ecospark::config::{AppConfig, Args};
use ecospark::data::tasks::TaskId;
use ecospark::emissions::{
    DetailedEmissionModel, EmissionCategory, EmissionModel, FootprintForm, FootprintReport,
    parse_household_size, QuickEmissionModel, QuickInputs,
};
use ecospark::rules::QuizSession;
use ecospark::session::{DashboardIntent, DashboardSnapshot, Session};
use ecospark::Registration;

fn main() {
    let args = Args::parse();
    let config = match AppConfig::from_args(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to read config: {}", err);
            std::process::exit(1);
        }
    };

    let store = match config.open_store() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("Failed to open user store at {}: {}", config.users_path().display(), err);
            std::process::exit(1);
        }
    };
    let tasks = match config.task_catalog() {
        Ok(tasks) => tasks,
        Err(err) => {
            eprintln!("Failed to load task catalog: {}", err);
            std::process::exit(1);
        }
    };
    let badges = match config.badge_catalog() {
        Ok(badges) => badges,
        Err(err) => {
            eprintln!("Failed to load badge catalog: {}", err);
            std::process::exit(1);
        }
    };

    println!("Welcome to EcoSpark!");
    println!(
        "{} users, {} tasks, {} badges loaded from {}. Type 'help' for commands.",
        store.len(),
        tasks.len(),
        badges.len(),
        store.location()
    );

    let mut session = Session::new(store, tasks, badges, config.quiz_bank());
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}> ", session.current_email().unwrap_or("guest"));
        let _ = io::stdout().flush();
        let Some(Ok(line)) = lines.next() else {
            break;
        };
        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            continue;
        };

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "register" => {
                let registration = Registration {
                    name: prompt(&mut lines, "Name"),
                    email: prompt(&mut lines, "Email"),
                    password: prompt(&mut lines, "Password"),
                    confirm_password: prompt(&mut lines, "Confirm password"),
                };
                match session.register(registration) {
                    Ok(profile) => println!("Account created for {}. You can log in now.", profile.email),
                    Err(err) => println!("Registration failed: {}", err),
                }
            }
            "login" => {
                let email = match parts.next() {
                    Some(email) => email.to_string(),
                    None => prompt(&mut lines, "Email"),
                };
                let password = prompt(&mut lines, "Password");
                if session.login(&email, &password) {
                    if let Some(user) = session.current_user() {
                        println!("Welcome back, {}!", user.name);
                    }
                } else {
                    println!("Invalid email or password.");
                }
            }
            "logout" => {
                session.logout();
                println!("Logged out.");
            }
            "tasks" | "dashboard" => match session.tick(Vec::new()) {
                Ok(snapshot) if cmd == "tasks" => print_tasks(&snapshot),
                Ok(snapshot) => print_dashboard(&snapshot),
                Err(err) => println!("Could not save your progress: {}", err),
            },
            "complete" => {
                let Some(id) = parts.next().and_then(|raw| raw.parse::<u32>().ok()) else {
                    println!("Usage: complete <task_id>");
                    continue;
                };
                let intents = vec![DashboardIntent::CompleteTask { task_id: TaskId(id) }];
                run_tick(&mut session, intents);
            }
            "rename" => {
                let name = parts.collect::<Vec<_>>().join(" ");
                run_tick(&mut session, vec![DashboardIntent::Rename { name }]);
            }
            "passwd" => {
                let current = prompt(&mut lines, "Current password");
                let new = prompt(&mut lines, "New password");
                run_tick(&mut session, vec![DashboardIntent::ChangePassword { current, new }]);
            }
            "delete" => {
                if session.current_email().is_none() {
                    println!("Log in first.");
                    continue;
                }
                let confirm = prompt(&mut lines, "Type DELETE to remove your account");
                if confirm != "DELETE" {
                    println!("Cancelled.");
                    continue;
                }
                match session.delete_account() {
                    Ok(true) => println!("Account deleted."),
                    Ok(false) => println!("No account to delete."),
                    Err(err) => println!("Account removed from this session but not saved: {}", err),
                }
            }
            "badges" => print_badges(&session),
            "footprint" => {
                let form = FootprintForm {
                    electricity: prompt(&mut lines, "Electricity (kWh per month)"),
                    gas: prompt(&mut lines, "Natural gas (therms per month)"),
                    car_miles: prompt(&mut lines, "Car travel (miles per year)"),
                    transit_miles: prompt(&mut lines, "Public transport (miles per year)"),
                    flight_miles: prompt(&mut lines, "Flights (miles per year)"),
                    diet: prompt(&mut lines, "Diet (vegetarian/omnivore)"),
                    meat_meals: prompt(&mut lines, "Meat meals per week"),
                    waste: prompt(&mut lines, "Waste (kg per year)"),
                };
                match form.parse().and_then(|inputs| DetailedEmissionModel.report(&inputs)) {
                    Ok(report) => print_report(DetailedEmissionModel.name(), &report),
                    Err(err) => println!("Invalid input: {}", err),
                }
            }
            "quick" => {
                let country = prompt(&mut lines, "Country");
                let vehicle = prompt(&mut lines, "Vehicle (gasoline/diesel/hybrid/electric/transit/none)");
                let diet = prompt(&mut lines, "Diet (heavy_meat/average/low_meat/pescatarian/vegetarian/vegan)");
                let recycles = matches!(
                    prompt(&mut lines, "Do you recycle? (y/n)").to_ascii_lowercase().as_str(),
                    "y" | "yes"
                );
                let household = prompt(&mut lines, "People in household");
                match parse_household_size(&household)
                    .and_then(|size| QuickInputs::from_keys(&country, &vehicle, &diet, recycles, size))
                    .and_then(|inputs| QuickEmissionModel.report(&inputs))
                {
                    Ok(report) => print_report(QuickEmissionModel.name(), &report),
                    Err(err) => println!("Invalid input: {}", err),
                }
            }
            "quiz" => {
                let mut quiz = QuizSession::new(session.quiz());
                while let Some(question) = quiz.current() {
                    println!("\nQuestion {} of {}: {}", quiz.question_number(), quiz.total(), question.prompt);
                    for (i, option) in question.options.iter().enumerate() {
                        println!("  {}. {}", i + 1, option);
                    }
                    let raw = prompt(&mut lines, "Your answer");
                    let choice = raw.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
                    match choice.map(|c| quiz.answer(c)) {
                        Some(Ok(outcome)) if outcome.correct => println!("Correct! {}", outcome.explanation),
                        Some(Ok(outcome)) => println!(
                            "Not quite. The answer is '{}'. {}",
                            outcome.correct_option, outcome.explanation
                        ),
                        Some(Err(err)) => println!("{}", err),
                        None => println!("Enter the number of an option."),
                    }
                }
                println!(
                    "\nYou scored {}/{} ({:.0}%). {}",
                    quiz.score(),
                    quiz.total(),
                    quiz.percent(),
                    quiz.rating().message()
                );
            }
            _ => println!("Unknown command '{}'. Type 'help' for commands.", cmd),
        }
    }

    println!("Goodbye. Keep sparking change!");
}

fn prompt<B: BufRead>(lines: &mut io::Lines<B>, label: &str) -> String {
    print!("{}: ", label);
    let _ = io::stdout().flush();
    match lines.next() {
        Some(Ok(line)) => line.trim().to_string(),
        _ => String::new(),
    }
}

fn run_tick(session: &mut Session, intents: Vec<DashboardIntent>) {
    match session.tick(intents) {
        Ok(snapshot) => {
            for line in &snapshot.activity {
                println!("{}", line);
            }
        }
        Err(err) => println!("Could not save your progress: {}", err),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  register              create an account");
    println!("  login [email]         log in");
    println!("  logout                log out");
    println!("  dashboard             points, badges and recent activity");
    println!("  tasks                 list eco tasks");
    println!("  complete <id>         mark a task as done");
    println!("  badges                list all badges");
    println!("  footprint             detailed carbon footprint calculator");
    println!("  quick                 quick footprint estimate");
    println!("  quiz                  take the climate quiz");
    println!("  rename <name>         change your display name");
    println!("  passwd                change your password");
    println!("  delete                delete your account");
    println!("  quit                  exit");
}

fn print_tasks(snapshot: &DashboardSnapshot) {
    for task in &snapshot.tasks {
        let mark = if task.completed { "x" } else { " " };
        println!(
            "[{}] {:>2}. {} ({} pts, {})",
            mark,
            task.id.0,
            task.title,
            task.points,
            task.category.label()
        );
        println!("        {}", task.description);
    }
}

fn print_dashboard(snapshot: &DashboardSnapshot) {
    let Some(user) = &snapshot.user else {
        println!("Log in to see your dashboard.");
        return;
    };
    println!("{} <{}>", user.name, user.email);
    println!("Points: {}   Tasks completed: {}", user.points, user.completed_count);
    if user.badges.is_empty() {
        println!("Badges: none yet");
    } else {
        println!("Badges: {}", user.badges.join(", "));
    }
    match &user.next_badge {
        Some(next) => println!(
            "Next badge: {} ({} more points)",
            next.badge.name, next.points_remaining
        ),
        None => println!("Every points badge earned!"),
    }
    if !user.recent_tasks.is_empty() {
        println!("Recent:");
        for title in &user.recent_tasks {
            println!("  - {}", title);
        }
    }
    for (category, count) in &user.category_counts {
        println!("  {:<20} {}", category.label(), count);
    }
}

fn print_badges(session: &Session) {
    let user = session.current_user();
    for badge in session.badges().iter() {
        let earned = user.map(|u| u.has_badge(&badge.name)).unwrap_or(false);
        let mark = if earned { "*" } else { " " };
        let requirement = if badge.is_points_gated() {
            format!("{} pts", badge.points_required)
        } else {
            badge
                .category
                .map(|c| format!("{} tasks", c.label()))
                .unwrap_or_else(|| "special".to_string())
        };
        println!("[{}] {:<26} {:<22} {}", mark, badge.name, requirement, badge.description);
    }
}

fn print_report(model: &str, report: &FootprintReport) {
    println!("\nYour estimated footprint ({} model):", model);
    for category in [
        EmissionCategory::Home,
        EmissionCategory::Transport,
        EmissionCategory::Food,
        EmissionCategory::Waste,
    ] {
        println!(
            "  {:<12} {:>6.2} t  ({:>4.1}%)",
            category.label(),
            report.breakdown.get(category),
            report.share_percent(category)
        );
    }
    println!("  {:<12} {:>6.2} t CO2e per year", "Total", report.total);
    println!("Status: {}. {}", report.status.label(), report.status.message());
    println!("Offsetting it would cost about ${:.2} per year.", report.offset_cost_usd);
    if report.reduction_needed_percent > 0.0 {
        println!(
            "Cut {:.0}% to reach a 2-ton lifestyle. Start with {}.",
            report.reduction_needed_percent,
            report.largest_category.label().to_lowercase()
        );
    } else {
        println!("You're already within a 2-ton lifestyle!");
    }
}
