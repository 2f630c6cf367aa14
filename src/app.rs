// src/app.rs
//
// Calculatrice RPN : module App (racine)
// --------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Boucle interactive : invite -> ligne -> actions -> rendu
// - Mode ligne unique : une expression, le sommet formaté en sortie
//   (help et quit y gardent leur sens)
//
// Important:
// - La boucle ne connaît que les traits SourceLignes / Rendu (testable sans terminal).
// - Une erreur de ligne est une action comme une autre; seules les erreurs
//   d’entrée/sortie interrompent la boucle.

pub mod etat;
pub mod vue;

pub use etat::{Action, Reglages, Session};
pub use vue::{texte_aide, Console, Rendu, SourceLignes, Terminal, ADIEU};

use anyhow::{Context, Result};
use tracing::debug;

use crate::noyau::{Calculatrice, Contexte};

pub fn interactif(
    session: &mut Session,
    source: &mut impl SourceLignes,
    rendu: &mut impl Rendu,
) -> Result<()> {
    loop {
        for ligne in session.avant_saisie() {
            rendu.executer(&Action::Texte(ligne), session.registre())?;
        }
        source.definir_invite(session.invite());

        let Some(ligne) = source.lire_ligne()? else {
            debug!("fin de la saisie");
            return Ok(());
        };
        for action in session.traiter(&ligne) {
            rendu.executer(&action, session.registre())?;
            if action == Action::Fin {
                return Ok(());
            }
        }
    }
}

/// Évalue une expression; lignes à écrire sur stdout.
///
/// Le sommet sort sans forme groupée. « help » ajoute l’aide (sans couleur ni
/// pager), « quit » arrête la ligne et remplace le sommet par l’adieu.
pub fn unique(mut contexte: Contexte, expression: &str) -> Result<Vec<String>> {
    contexte.groupage = false;
    let mut calc = Calculatrice::new(contexte);
    let ev = calc
        .evaluer(expression)
        .with_context(|| format!("évaluation de {expression:?}"))?;

    let mut lignes = Vec::new();
    if ev.aide {
        lignes.push(texte_aide(calc.registre(), false));
    }
    if ev.quitter {
        lignes.push(ADIEU.to_string());
    } else {
        lignes.push(calc.afficher_sommet());
    }
    Ok(lignes)
}
