// src/main.rs
//
// Calculatrice RPN : point d’entrée (terminal)
// --------------------------------------------
// But:
// - Sans expression : session interactive (rustyline, historique, aide paginée)
// - Avec expression : évaluation unique, sommet affiché sur stdout
// - Journal sur stderr (RUST_LOG, ou -v / -vv / -vvv / -vvvv)
//
// IMPORTANT (structure projet):
// - La boucle et le rendu vivent dans src/app.rs + src/app/
// - Ici: options, journal, aiguillage seulement

mod app;
mod noyau;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use app::{Console, Reglages, Session, Terminal};
use noyau::contexte::DECIMALES_DEFAUT;
use noyau::Base;

/// Calculatrice en notation polonaise inverse, 34 chiffres décimaux.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Options {
    /// Expression à évaluer (ex. : 1 2 + 3 *); sans expression : mode interactif
    #[arg(trailing_var_arg = true, allow_negative_numbers = true)]
    expression: Vec<String>,

    /// Base d’affichage : 2, 8, 10 ou 16
    #[arg(long, env = "RPN_BASE", default_value = "10")]
    base: Base,

    /// Nombre de décimales affichées (0 à 34)
    #[arg(long, env = "RPN_DECIMALES", default_value_t = DECIMALES_DEFAUT)]
    decimales: usize,

    /// Démarrer en mode degrés
    #[arg(long)]
    degres: bool,

    /// Division par zéro : erreur au lieu de ±Infinity / NaN
    #[arg(long)]
    pieger_division: bool,

    /// Aide toujours sur stdout, jamais dans un pager
    #[arg(long)]
    sans_pager: bool,

    /// Verbosité du journal (répéter : -v avertissements … -vvvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/* ------------------------ Journal ------------------------ */

fn installer_journal(verbose: u8) -> Result<()> {
    let filtre = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        1 => EnvFilter::new("warn"),
        2 => EnvFilter::new("info"),
        3 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let abonne = FmtSubscriber::builder()
        .with_env_filter(filtre)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(abonne).context("installation du journal")
}

/* ------------------------ Entrée ------------------------ */

fn main() -> Result<()> {
    let options = Options::parse();
    installer_journal(options.verbose)?;

    let reglages = Reglages {
        base: options.base,
        decimales: options.decimales,
        degres: options.degres,
        pieger_division: options.pieger_division,
    };
    info!(?reglages, pager = !options.sans_pager, "démarrage");
    let contexte = reglages.contexte();

    if !options.expression.is_empty() {
        let expression = options.expression.join(" ");
        for ligne in app::unique(contexte, &expression)? {
            println!("{ligne}");
        }
        return Ok(());
    }

    let mut session = Session::new(contexte);
    let mut terminal = Terminal::new()?;
    let mut console = Console::new(!options.sans_pager);
    app::interactif(&mut session, &mut terminal, &mut console)
}
