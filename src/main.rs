use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use bizdesk::config::{self, Cli, Config};
use bizdesk::db::{self, Store};
use bizdesk::models::Entity;
use bizdesk::ui::{
    add_failure_message,
    clients::{ClientWizardState, ClientsState},
    invoices::{InvoiceWizardState, InvoicesState},
    menu::{handle_input as handle_menu_input, render_menu, MenuAction, MenuState},
    projects::{ProjectWizardState, ProjectsState},
    records::{handle_input as handle_list_input, render_records, ListAction},
    wizard::{handle_input as handle_wizard_input, render_wizard, WizardAction},
};

// Represents the current screen in the app
enum AppScreen {
    Menu,
    Clients,
    ClientWizard,
    Projects,
    ProjectWizard,
    Invoices,
    InvoiceWizard,
}

// Main application state
struct AppState {
    store: Store,
    screen: AppScreen,
    menu_state: MenuState,
    clients_state: Option<ClientsState>,
    client_wizard_state: Option<ClientWizardState>,
    projects_state: Option<ProjectsState>,
    project_wizard_state: Option<ProjectWizardState>,
    invoices_state: Option<InvoicesState>,
    invoice_wizard_state: Option<InvoiceWizardState>,
}

impl AppState {
    fn new(store: Store) -> Self {
        Self {
            store,
            screen: AppScreen::Menu,
            menu_state: MenuState::new(),
            clients_state: None,
            client_wizard_state: None,
            projects_state: None,
            project_wizard_state: None,
            invoices_state: None,
            invoice_wizard_state: None,
        }
    }
}

fn init_tracing(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init(&cli)?;
    init_tracing(&config)?;
    info!(database = %config.database_path.display(), "starting");

    // Create missing tables before anything reads them
    let store = db::init(&config).await?;

    if cli.init_only {
        println!("Database initialized at {}", store.path().display());
        return Ok(());
    }

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(store);

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(error = %err, "exiting on error");
    }

    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| match app_state.screen {
            AppScreen::Menu => render_menu(f, &mut app_state.menu_state),
            AppScreen::Clients => {
                if let Some(state) = &mut app_state.clients_state {
                    render_records(f, state);
                }
            }
            AppScreen::ClientWizard => {
                if let Some(state) = &mut app_state.client_wizard_state {
                    render_wizard(f, state);
                }
            }
            AppScreen::Projects => {
                if let Some(state) = &mut app_state.projects_state {
                    render_records(f, state);
                }
            }
            AppScreen::ProjectWizard => {
                if let Some(state) = &mut app_state.project_wizard_state {
                    render_wizard(f, state);
                }
            }
            AppScreen::Invoices => {
                if let Some(state) = &mut app_state.invoices_state {
                    render_records(f, state);
                }
            }
            AppScreen::InvoiceWizard => {
                if let Some(state) = &mut app_state.invoice_wizard_state {
                    render_wizard(f, state);
                }
            }
        })?;

        // Handle input for current screen
        let should_quit = match app_state.screen {
            AppScreen::Menu => handle_menu_screen(app_state).await?,
            AppScreen::Clients => handle_clients_screen(app_state).await?,
            AppScreen::ClientWizard => handle_client_wizard_screen(app_state).await?,
            AppScreen::Projects => handle_projects_screen(app_state).await?,
            AppScreen::ProjectWizard => handle_project_wizard_screen(app_state).await?,
            AppScreen::Invoices => handle_invoices_screen(app_state).await?,
            AppScreen::InvoiceWizard => handle_invoice_wizard_screen(app_state).await?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

async fn open_list_screen(app_state: &mut AppState, entity: Entity) -> Result<()> {
    match entity {
        Entity::Client => {
            app_state.clients_state = Some(ClientsState::load(&app_state.store).await?);
            app_state.screen = AppScreen::Clients;
        }
        Entity::Project => {
            app_state.projects_state = Some(ProjectsState::load(&app_state.store).await?);
            app_state.screen = AppScreen::Projects;
        }
        Entity::Invoice => {
            app_state.invoices_state = Some(InvoicesState::load(&app_state.store).await?);
            app_state.screen = AppScreen::Invoices;
        }
    }

    Ok(())
}

async fn handle_menu_screen(app_state: &mut AppState) -> Result<bool> {
    match handle_menu_input(&mut app_state.menu_state)? {
        Some(MenuAction::Exit) => return Ok(true),
        Some(MenuAction::Open(entity)) => open_list_screen(app_state, entity).await?,
        None => {}
    }

    Ok(false)
}

/// Shared handling for the three list screens
async fn handle_list_action(
    app_state: &mut AppState,
    entity: Entity,
    action: Option<ListAction>,
) -> Result<()> {
    match action {
        Some(ListAction::Back) => {
            app_state.screen = AppScreen::Menu;
        }
        Some(ListAction::New) => match entity {
            Entity::Client => {
                app_state.client_wizard_state = Some(ClientWizardState::new());
                app_state.screen = AppScreen::ClientWizard;
            }
            Entity::Project => {
                app_state.project_wizard_state = Some(ProjectWizardState::new());
                app_state.screen = AppScreen::ProjectWizard;
            }
            Entity::Invoice => {
                app_state.invoice_wizard_state = Some(InvoiceWizardState::new());
                app_state.screen = AppScreen::InvoiceWizard;
            }
        },
        Some(ListAction::Delete(id)) => {
            app_state.store.delete(entity, id).await?;

            // Reload the list
            open_list_screen(app_state, entity).await?;
        }
        None => {}
    }

    Ok(())
}

async fn handle_clients_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.clients_state {
        Some(state) => handle_list_input(state)?,
        None => None,
    };
    handle_list_action(app_state, Entity::Client, action).await?;

    Ok(false)
}

async fn handle_projects_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.projects_state {
        Some(state) => handle_list_input(state)?,
        None => None,
    };
    handle_list_action(app_state, Entity::Project, action).await?;

    Ok(false)
}

async fn handle_invoices_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.invoices_state {
        Some(state) => handle_list_input(state)?,
        None => None,
    };
    handle_list_action(app_state, Entity::Invoice, action).await?;

    Ok(false)
}

async fn handle_client_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.client_wizard_state {
        match handle_wizard_input(state)? {
            Some(WizardAction::Cancel) => {
                open_list_screen(app_state, Entity::Client).await?;
            }
            Some(WizardAction::Save(client)) => match client.save(&app_state.store).await {
                Ok(_) => open_list_screen(app_state, Entity::Client).await?,
                Err(err) => state.set_message(add_failure_message(err)?),
            },
            None => {}
        }
    }

    Ok(false)
}

async fn handle_project_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.project_wizard_state {
        match handle_wizard_input(state)? {
            Some(WizardAction::Cancel) => {
                open_list_screen(app_state, Entity::Project).await?;
            }
            Some(WizardAction::Save(project)) => match project.save(&app_state.store).await {
                Ok(_) => open_list_screen(app_state, Entity::Project).await?,
                Err(err) => state.set_message(add_failure_message(err)?),
            },
            None => {}
        }
    }

    Ok(false)
}

async fn handle_invoice_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.invoice_wizard_state {
        match handle_wizard_input(state)? {
            Some(WizardAction::Cancel) => {
                open_list_screen(app_state, Entity::Invoice).await?;
            }
            Some(WizardAction::Save(invoice)) => match invoice.save(&app_state.store).await {
                Ok(_) => open_list_screen(app_state, Entity::Invoice).await?,
                Err(err) => state.set_message(add_failure_message(err)?),
            },
            None => {}
        }
    }

    Ok(false)
}
