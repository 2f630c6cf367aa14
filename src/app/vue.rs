// src/app/vue.rs
//
// Vue (terminal)
// --------------
// - SourceLignes : d’où viennent les lignes (rustyline en vrai, une liste en test)
// - Rendu : où vont les actions (stdout coloré en vrai, un tampon en test)
// - L’aide passe par un pager trouvé dans le PATH (less -R, sinon more),
//   sinon elle s’écrit directement
//
// Note :
// - Ctrl-D et Ctrl-C terminent la saisie proprement (pas une erreur)
// - les couleurs ne partent vers le pager que s’il les comprend (less -R)

use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, warn};

use super::etat::Action;
use crate::noyau::{Annotation, Entree};

pub const ADIEU: &str = "Bye.";

/* ------------------------ Collaborateurs ------------------------ */

pub trait SourceLignes {
    fn definir_invite(&mut self, invite: &str);

    /// None : fin de la saisie.
    fn lire_ligne(&mut self) -> Result<Option<String>>;
}

pub trait Rendu {
    fn executer(&mut self, action: &Action, registre: &[Entree]) -> Result<()>;
}

/* ------------------------ Saisie (rustyline) ------------------------ */

pub struct Terminal {
    editeur: DefaultEditor,
    invite: String,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let editeur = DefaultEditor::new().context("initialisation du terminal")?;
        Ok(Self {
            editeur,
            invite: String::new(),
        })
    }
}

impl SourceLignes for Terminal {
    fn definir_invite(&mut self, invite: &str) {
        self.invite.clear();
        self.invite.push_str(invite);
    }

    fn lire_ligne(&mut self) -> Result<Option<String>> {
        match self.editeur.readline(&self.invite) {
            Ok(ligne) => {
                if !ligne.trim().is_empty() {
                    self.editeur
                        .add_history_entry(ligne.as_str())
                        .context("historique de saisie")?;
                }
                Ok(Some(ligne))
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
            Err(e) => Err(e).context("lecture de la ligne"),
        }
    }
}

/* ------------------------ Rendu (stdout) ------------------------ */

pub struct Console {
    pager: bool,
}

impl Console {
    /// `pager` : autoriser l’aide paginée.
    pub fn new(pager: bool) -> Self {
        Self { pager }
    }

    fn aide(&self, registre: &[Entree]) -> Result<()> {
        if self.pager {
            if let Some(p) = Pager::trouver() {
                let texte = texte_aide(registre, p.couleur);
                match p.afficher(&texte) {
                    Ok(()) => return Ok(()),
                    // pager cassé : on retombe sur stdout
                    Err(e) => warn!(pager = %p.chemin.display(), erreur = %e, "pager indisponible"),
                }
            }
        }
        println!("{}", texte_aide(registre, true));
        Ok(())
    }
}

impl Rendu for Console {
    fn executer(&mut self, action: &Action, registre: &[Entree]) -> Result<()> {
        match action {
            Action::Texte(t) => println!("{t}"),
            Action::Resultat(v) => println!("= {v}"),
            Action::Erreur(e) => println!("{} {e}", "ERREUR :".red().bold()),
            Action::Aide => self.aide(registre)?,
            Action::Fin => println!("{ADIEU}"),
        }
        Ok(())
    }
}

/// Aide complète : annotations et opérations dans l’ordre du registre.
pub fn texte_aide(registre: &[Entree], couleur: bool) -> String {
    let mut lignes = Vec::with_capacity(registre.len());
    for e in registre {
        match e {
            Entree::Annotation(Annotation { texte, gras: true }) if couleur => {
                lignes.push(texte.bold().to_string())
            }
            Entree::Annotation(Annotation { texte, .. }) => lignes.push(texte.to_string()),
            Entree::Operation(op) => lignes.push(format!("  - {}: {}", op.nom, op.description)),
        }
    }
    lignes.join("\n")
}

/* ------------------------ Pager ------------------------ */

struct Pager {
    chemin: PathBuf,
    args: &'static [&'static str],
    couleur: bool,
}

impl Pager {
    fn trouver() -> Option<Self> {
        const CANDIDATS: [(&str, &[&str], bool); 2] = [("less", &["-R"], true), ("more", &[], false)];
        CANDIDATS.iter().find_map(|(nom, args, couleur)| {
            chercher_dans_path(nom).map(|chemin| Pager {
                chemin,
                args: *args,
                couleur: *couleur,
            })
        })
    }

    fn afficher(&self, texte: &str) -> Result<()> {
        debug!(pager = %self.chemin.display(), "aide paginée");
        let mut enfant = Command::new(&self.chemin)
            .args(self.args)
            .stdin(Stdio::piped())
            .spawn()
            .with_context(|| format!("lancement de {}", self.chemin.display()))?;

        if let Some(mut entree) = enfant.stdin.take() {
            // le lecteur peut quitter avant la fin (q dans less)
            let _ = writeln!(entree, "{texte}");
        }
        enfant.wait().context("attente du pager")?;
        Ok(())
    }
}

fn chercher_dans_path(nom: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dossier| dossier.join(nom))
        .find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::operations::registre;

    #[test]
    fn aide_dans_l_ordre_du_registre() {
        let texte = texte_aide(&registre(), false);
        let lignes: Vec<&str> = texte.lines().collect();
        assert!(lignes[0].starts_with("Aide en ligne de "));

        let titre = lignes.iter().position(|l| *l == "Opérations de base");
        let plus = lignes.iter().position(|l| *l == "  - +: Additionne x et y");
        assert!(matches!((titre, plus), (Some(t), Some(p)) if t < p));
        assert!(lignes.contains(&"  - quit, exit, q: quitter"));
    }

    #[test]
    fn aide_sans_couleur_sans_echappement() {
        let texte = texte_aide(&registre(), false);
        assert!(!texte.contains('\u{1b}'));
    }

    #[test]
    fn path_introuvable() {
        assert_eq!(chercher_dans_path("commande-qui-n-existe-pas-42"), None);
    }
}
