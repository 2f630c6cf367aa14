// src/noyau/eval.rs
//
// Répartiteur : une ligne de saisie -> effets sur la pile.
// Pipeline : commentaire ? -> sauvegarde -> jetons -> (opération | mot de
// contrôle | littéral) -> restauration si erreur.
//
// Règles :
// - la première erreur arrête la ligne et rend la pile d’avant la ligne
// - `quit` arrête la lecture des jetons restants (pile conservée)
// - l’affichage automatique n’a lieu que si une opération a consommé ou
//   produit des cellules

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use super::contexte::Contexte;
use super::erreur::{Erreur, Resultat};
use super::format::formater_ctx;
use super::jetons::{decouper, est_commentaire, format_jetons, lire_nombre};
use super::operations::{registre, table, Entree, Operation};
use super::pile::Pile;

const MOTS_AIDE: &[&str] = &["help", "h", "?"];
const MOTS_SORTIE: &[&str] = &["quit", "exit", "q"];

/// Ce qu’une ligne demande à l’appelant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Afficher le nouveau sommet (« = x »).
    pub afficher: bool,
    /// Lignes produites par les opérations, dans l’ordre.
    pub sorties: Vec<String>,
    pub aide: bool,
    pub quitter: bool,
}

pub struct Calculatrice {
    pile: Pile,
    contexte: Contexte,
    registre: Vec<Entree>,
    table: HashMap<&'static str, Operation>,
}

impl Default for Calculatrice {
    fn default() -> Self {
        Self::new(Contexte::default())
    }
}

impl Calculatrice {
    pub fn new(contexte: Contexte) -> Self {
        let registre = registre();
        let table = table(&registre);
        Self {
            pile: Pile::new(),
            contexte,
            registre,
            table,
        }
    }

    pub fn contexte(&self) -> &Contexte {
        &self.contexte
    }

    pub fn registre(&self) -> &[Entree] {
        &self.registre
    }

    pub fn pile(&self) -> &Pile {
        &self.pile
    }

    pub fn invite(&self) -> &'static str {
        self.contexte.invite()
    }

    /// Sommet formaté selon le contexte courant (zéro si pile vide).
    pub fn afficher_sommet(&self) -> String {
        formater_ctx(&self.pile.sommet(), &self.contexte)
    }

    /// Évalue une ligne entière.
    ///
    /// En cas d’erreur la pile est remise dans l’état d’avant la ligne.
    pub fn evaluer(&mut self, ligne: &str) -> Resultat<Evaluation> {
        if est_commentaire(ligne) {
            trace!(ligne, "commentaire ignoré");
            return Ok(Evaluation::default());
        }

        self.pile.sauver();
        let jetons = decouper(ligne);
        debug!(jetons = %format_jetons(&jetons), "ligne");

        match self.evaluer_jetons(&jetons) {
            Ok(ev) => Ok(ev),
            Err(e) => {
                warn!(erreur = %e, "ligne annulée, pile restaurée");
                self.pile.restaurer();
                Err(e)
            }
        }
    }

    fn evaluer_jetons(&mut self, jetons: &[String]) -> Resultat<Evaluation> {
        let mut ev = Evaluation::default();

        for jeton in jetons {
            let jeton = jeton.as_str();

            if let Some(op) = self.table.get(jeton).copied() {
                if self.appliquer(&op, &mut ev.sorties)? {
                    ev.afficher = true;
                }
                continue;
            }
            if MOTS_AIDE.iter().any(|m| *m == jeton) {
                ev.aide = true;
                continue;
            }
            if MOTS_SORTIE.iter().any(|m| *m == jeton) {
                ev.quitter = true;
                return Ok(ev);
            }

            let v = lire_nombre(jeton, &self.contexte.arith)?;
            trace!(jeton, valeur = %v, "empilé");
            self.pile.empiler([v]);
        }
        Ok(ev)
    }

    /// Applique une opération; vrai si la pile a changé.
    fn appliquer(&mut self, op: &Operation, sorties: &mut Vec<String>) -> Resultat<bool> {
        let presents = self.pile.len();
        if presents < op.arite {
            return Err(Erreur::PileInsuffisante {
                op: op.nom.to_string(),
                requis: op.arite,
                presents,
            });
        }

        let vus = if op.pile_entiere { presents } else { op.arite };
        let args = self.pile.sommets(vus).ok_or_else(|| Erreur::Incoherence {
            op: op.nom.to_string(),
            demande: vus,
            presents,
        })?;
        let effet = (op.fonction)(&mut self.contexte, &args)?;

        self.pile
            .retirer(effet.consommes)
            .ok_or_else(|| Erreur::Incoherence {
                op: op.nom.to_string(),
                demande: effet.consommes,
                presents,
            })?;

        let change = effet.consommes > 0 || !effet.valeurs.is_empty();
        debug!(
            op = op.nom,
            consommes = effet.consommes,
            produits = effet.valeurs.len(),
            "opération"
        );
        self.pile.empiler(effet.valeurs);
        sorties.extend(effet.messages);
        Ok(change)
    }
}
