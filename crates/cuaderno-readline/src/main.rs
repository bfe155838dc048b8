use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Editor;
use rustyline::{Context, Helper};
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

use cuaderno_application::controller::{
    AppController, ListView, LOADING_ENTRIES_TEXT, NO_ENTRIES_TEXT,
};
use cuaderno_application::live_store::SIGNED_OUT_TEXT;
use cuaderno_application::notification::NoticeSeverity;
use cuaderno_core::draft::{Draft, MoodOption, ThemeOption};
use cuaderno_core::entry::{ActivityRecord, InterviewRecord};
use cuaderno_core::geolocation::GeolocationProvider;
use cuaderno_core::identity::IdentityProvider;
use cuaderno_core::store::DocumentStore;
use cuaderno_core::view::{
    activity_rows, interview_rows, EntryCard, EMPTY_ACTIVITY_LOG_TEXT, EMPTY_INTERVIEW_LOG_TEXT,
};
use cuaderno_infrastructure::{
    AnonymousIdentityProvider, ConfigService, JsonDirEntryStore, StaticGeolocationProvider,
};

const COMMANDS: &[&str] = &[
    "/ayuda",
    "/usuario",
    "/titulo",
    "/lugar",
    "/etiquetas",
    "/tono",
    "/tema",
    "/campo",
    "/actividad",
    "/conversacion",
    "/quitar-actividad",
    "/quitar-conversacion",
    "/borrador",
    "/geo",
    "/guardar",
    "/lista",
    "/filtrar",
];

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|cmd| cmd.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn print_help() {
    println!("{}", "Borrador:".bright_magenta());
    println!("  /titulo <texto>            título de la entrada");
    println!("  /lugar <texto>             lugar de la observación");
    println!("  /etiquetas <a, b, c>       etiquetas separadas por comas");
    println!("  /tono <opción>             clasificación de tono");
    println!("  /tema <opción>             clasificación de tema");
    println!("  /campo <clave> <texto>     campo estructurado (ver /campo)");
    println!("  /actividad h|tipo|desc     añadir registro de actividad");
    println!("  /conversacion h|tipo|rol|edad|prof|región|cita");
    println!("  /quitar-actividad <n>      quitar registro de actividad");
    println!("  /quitar-conversacion <n>   quitar registro de conversación");
    println!("  /borrador                  mostrar el borrador actual");
    println!("  /geo                       registrar la ubicación actual");
    println!("  /guardar                   guardar la observación");
    println!("{}", "Entradas:".bright_magenta());
    println!("  /lista                     listar las entradas guardadas");
    println!("  /filtrar <texto>           filtrar las entradas");
    println!("  /usuario                   mostrar el usuario actual");
    println!("  salir                      terminar la sesión");
}

const FIELD_KEYS: &[(&str, &str)] = &[
    ("contexto-espacial", "Contexto espacial"),
    ("contexto-demografia", "Demografía"),
    ("contexto-social", "Ambiente social"),
    ("repertorio", "Repertorio"),
    ("analisis", "Análisis musical"),
    ("funcion", "Función social"),
    ("reflexion", "Reflexión"),
    ("notas", "Notas personales"),
    ("medios", "Notas de medios"),
];

fn print_card(card: &EntryCard) {
    println!("{}", card.title.bright_white().bold());
    println!(
        "  {}  {}",
        card.entry_type.bright_black(),
        card.date.bright_black()
    );
    if !card.location.is_empty() {
        println!("  Lugar: {}", card.location);
    }
    if let Some(geo) = &card.geolocation {
        println!("  Coordenadas: {}", geo);
    }
    println!("  Tono: {}  Tema: {}", card.mood, card.theme);
    if !card.tags.is_empty() {
        let chips: Vec<String> = card.tags.iter().map(|t| format!("#{}", t)).collect();
        println!("  {}", chips.join(" ").bright_cyan());
    }
    println!("  {}", card.summary);
}

fn print_view(view: &ListView) {
    match view {
        ListView::Loading => println!("{}", LOADING_ENTRIES_TEXT.bright_black()),
        ListView::SignedOut => println!("{}", SIGNED_OUT_TEXT.yellow()),
        ListView::Empty => println!("{}", NO_ENTRIES_TEXT.bright_black()),
        ListView::Error(text) => println!("{}", text.red()),
        ListView::Entries(cards) => {
            for card in cards {
                print_card(card);
                println!();
            }
            println!("{}", format!("{} entradas", cards.len()).bright_black());
        }
    }
}

fn print_draft(draft: &Draft) {
    let f = &draft.fields;
    println!("{}", "Borrador actual".bright_magenta().bold());
    println!("  Título: {}", f.title);
    println!("  Lugar: {}", f.location);
    println!("  Coordenadas: {}", f.geolocation);
    println!("  Etiquetas: {}", f.tags);
    println!("  Tono: {}  Tema: {}", f.mood, f.theme);
    for (key, label) in FIELD_KEYS {
        let value = structured_field(f, key).unwrap_or_default();
        if !value.is_empty() {
            println!("  {}: {}", label, value);
        }
    }
    println!("{}", "Registro de actividades".bright_magenta());
    let rows = activity_rows(&draft.activity_log);
    if rows.is_empty() {
        println!("  {}", EMPTY_ACTIVITY_LOG_TEXT.bright_black());
    }
    for row in rows {
        println!("  [{}] {}", row.index, row.text);
    }
    println!("{}", "Registro de conversaciones".bright_magenta());
    let rows = interview_rows(&draft.interview_log);
    if rows.is_empty() {
        println!("  {}", EMPTY_INTERVIEW_LOG_TEXT.bright_black());
    }
    for row in rows {
        println!("  [{}] {}", row.index, row.text);
    }
}

fn structured_field(fields: &cuaderno_core::draft::DraftFields, key: &str) -> Option<String> {
    let value = match key {
        "contexto-espacial" => &fields.context_spatial,
        "contexto-demografia" => &fields.context_demography,
        "contexto-social" => &fields.context_social,
        "repertorio" => &fields.etno_repertoire,
        "analisis" => &fields.etno_analysis,
        "funcion" => &fields.etno_function,
        "reflexion" => &fields.social_reflection,
        "notas" => &fields.notes_personal,
        "medios" => &fields.notes_media,
        _ => return None,
    };
    Some(value.clone())
}

fn parse_activity(arg: &str) -> Option<ActivityRecord> {
    let mut parts = arg.splitn(3, '|');
    Some(ActivityRecord {
        time: parts.next()?.trim().to_string(),
        kind: parts.next()?.trim().to_string(),
        description: parts.next()?.trim().to_string(),
    })
}

fn parse_interview(arg: &str) -> Option<InterviewRecord> {
    let mut parts = arg.splitn(7, '|');
    Some(InterviewRecord {
        time: parts.next()?.trim().to_string(),
        kind: parts.next()?.trim().to_string(),
        role: parts.next()?.trim().to_string(),
        age: parts.next()?.trim().to_string(),
        profession: parts.next()?.trim().to_string(),
        region: parts.next()?.trim().to_string(),
        quote: parts.next()?.trim().to_string(),
    })
}

async fn handle_command(controller: &Arc<AppController>, command: &str, arg: &str) {
    let outcome = match command {
        "/ayuda" => {
            print_help();
            Ok(())
        }
        "/usuario" => {
            println!("{}", controller.user_label().await.bright_black());
            Ok(())
        }
        "/titulo" => {
            let value = arg.to_string();
            controller.edit_fields(|f| f.title = value).await;
            Ok(())
        }
        "/lugar" => {
            let value = arg.to_string();
            controller.edit_fields(|f| f.location = value).await;
            Ok(())
        }
        "/etiquetas" => {
            let value = arg.to_string();
            controller.edit_fields(|f| f.tags = value).await;
            Ok(())
        }
        "/tono" => match arg.parse::<MoodOption>() {
            Ok(mood) => {
                controller.edit_fields(|f| f.mood = mood.to_string()).await;
                Ok(())
            }
            Err(_) => {
                let options: Vec<String> = MoodOption::iter().map(|m| m.to_string()).collect();
                println!("{}", format!("Opciones de tono: {}", options.join(", ")).yellow());
                Ok(())
            }
        },
        "/tema" => match arg.parse::<ThemeOption>() {
            Ok(theme) => {
                controller.edit_fields(|f| f.theme = theme.to_string()).await;
                Ok(())
            }
            Err(_) => {
                let options: Vec<String> = ThemeOption::iter().map(|t| t.to_string()).collect();
                println!("{}", format!("Opciones de tema: {}", options.join(", ")).yellow());
                Ok(())
            }
        },
        "/campo" => {
            let (key, text) = arg.split_once(' ').unwrap_or((arg, ""));
            let key = key.to_string();
            let text = text.to_string();
            let known = FIELD_KEYS.iter().any(|(k, _)| *k == key);
            if !known {
                let keys: Vec<&str> = FIELD_KEYS.iter().map(|(k, _)| *k).collect();
                println!("{}", format!("Campos: {}", keys.join(", ")).yellow());
                return;
            }
            controller
                .edit_fields(|f| match key.as_str() {
                    "contexto-espacial" => f.context_spatial = text,
                    "contexto-demografia" => f.context_demography = text,
                    "contexto-social" => f.context_social = text,
                    "repertorio" => f.etno_repertoire = text,
                    "analisis" => f.etno_analysis = text,
                    "funcion" => f.etno_function = text,
                    "reflexion" => f.social_reflection = text,
                    "notas" => f.notes_personal = text,
                    "medios" => f.notes_media = text,
                    _ => {}
                })
                .await;
            Ok(())
        }
        "/actividad" => match parse_activity(arg) {
            Some(record) => controller.append_activity(record).await,
            None => {
                println!("{}", "Uso: /actividad hora|tipo|descripción".yellow());
                Ok(())
            }
        },
        "/conversacion" => match parse_interview(arg) {
            Some(record) => controller.append_interview(record).await,
            None => {
                println!(
                    "{}",
                    "Uso: /conversacion hora|tipo|rol|edad|profesión|región|cita".yellow()
                );
                Ok(())
            }
        },
        "/quitar-actividad" => match arg.parse::<usize>() {
            Ok(index) => controller.remove_activity(index).await,
            Err(_) => {
                println!("{}", "Uso: /quitar-actividad <número>".yellow());
                Ok(())
            }
        },
        "/quitar-conversacion" => match arg.parse::<usize>() {
            Ok(index) => controller.remove_interview(index).await,
            Err(_) => {
                println!("{}", "Uso: /quitar-conversacion <número>".yellow());
                Ok(())
            }
        },
        "/borrador" => {
            print_draft(&controller.draft_snapshot().await);
            println!(
                "  {}",
                controller.geolocation.status().to_string().bright_black()
            );
            Ok(())
        }
        "/geo" => {
            println!("{}", "Buscando ubicación...".bright_black());
            // Success and failure both land in the status line.
            let _ = controller.capture_location().await;
            println!("{}", controller.geolocation.status());
            Ok(())
        }
        "/guardar" => {
            // Outcome notices arrive through the notice watcher.
            let _ = controller.submit().await;
            Ok(())
        }
        "/lista" => {
            print_view(&controller.view("").await);
            Ok(())
        }
        "/filtrar" => {
            print_view(&controller.view(arg).await);
            Ok(())
        }
        _ => {
            println!("{}", "Comando desconocido. Escribe /ayuda.".bright_black());
            Ok(())
        }
    };

    if let Err(e) = outcome {
        println!("{}", e.to_string().red());
    }
}

/// The main entry point for the cuaderno readline application.
///
/// Sets up a rustyline-based REPL that:
/// 1. Loads the configuration and wires the file-backed providers
/// 2. Signs in anonymously and opens the live entry subscription
/// 3. Provides command completion for the /comando set
/// 4. Prints transient notices and the persistent banner from background
///    watchers as they change
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // ===== Backend Initialization =====
    let config_service = ConfigService::new();
    let config = match config_service.get_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            return Ok(());
        }
    };
    let data_dir = match config_service.resolve_data_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            return Ok(());
        }
    };

    let identity: Arc<dyn IdentityProvider> = Arc::new(AnonymousIdentityProvider::default_location()?);
    let store: Arc<dyn DocumentStore> = Arc::new(JsonDirEntryStore::new(&data_dir));
    let geolocation: Arc<dyn GeolocationProvider> =
        Arc::new(StaticGeolocationProvider::from_config(&config));

    let controller = Arc::new(AppController::new(identity, store, geolocation));
    if let Err(e) = controller.init().await {
        // The list stays blocked, but the draft side still works.
        eprintln!("{}", e.to_string().red());
    }

    // ===== Background Watchers =====
    let mut notice_rx = controller.notices.subscribe();
    tokio::spawn(async move {
        while notice_rx.changed().await.is_ok() {
            let notice = notice_rx.borrow_and_update().clone();
            if let Some(notice) = notice {
                match notice.severity {
                    NoticeSeverity::Success => println!("{}", notice.text.green()),
                    NoticeSeverity::Error => println!("{}", notice.text.red()),
                }
            }
        }
    });

    let mut banner_rx = controller.notices.subscribe_banner();
    tokio::spawn(async move {
        while banner_rx.changed().await.is_ok() {
            let banner = banner_rx.borrow_and_update().clone();
            if let Some(text) = banner {
                println!("{}", text.yellow());
            }
        }
    });

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Cuaderno de Campo ===".bright_magenta().bold());
    println!("{}", controller.user_label().await.bright_black());
    println!(
        "{}",
        "Escribe /ayuda para ver los comandos, o 'salir' para terminar.".bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline("cuaderno> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "salir" || trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "¡Hasta pronto!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                let (command, arg) = match trimmed.split_once(' ') {
                    Some((command, arg)) => (command, arg.trim()),
                    None => (trimmed, ""),
                };
                handle_command(&controller, command, arg).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detectado. Escribe 'salir' para terminar.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detectado. Saliendo...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    controller.teardown().await;

    Ok(())
}
