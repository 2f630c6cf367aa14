// src/noyau/pile.rs
//
// Pile de valeurs, sommet en fin de vecteur.
// Une sauvegarde unique permet d’annuler une ligne entière en cas d’erreur.

use super::decimal::Decimal;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pile {
    liste: Vec<Decimal>,
    sauvegarde: Vec<Decimal>,
}

impl Pile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.liste.len()
    }

    pub fn is_empty(&self) -> bool {
        self.liste.is_empty()
    }

    pub fn empiler(&mut self, valeurs: impl IntoIterator<Item = Decimal>) {
        self.liste.extend(valeurs);
    }

    /// Les n premières valeurs depuis le sommet (x, y, z…), sans retrait.
    pub fn sommets(&self, n: usize) -> Option<Vec<Decimal>> {
        if n > self.liste.len() {
            return None;
        }
        Some(self.liste.iter().rev().take(n).cloned().collect())
    }

    /// Retire n valeurs; None (pile intacte) si elle en contient moins.
    pub fn retirer(&mut self, n: usize) -> Option<Vec<Decimal>> {
        let debut = self.liste.len().checked_sub(n)?;
        Some(self.liste.split_off(debut))
    }

    pub fn vider(&mut self) {
        self.liste.clear();
    }

    /// Sommet, ou zéro si la pile est vide.
    pub fn sommet(&self) -> Decimal {
        self.liste.last().cloned().unwrap_or_default()
    }

    /// Du fond vers le sommet.
    pub fn valeurs(&self) -> &[Decimal] {
        &self.liste
    }

    pub fn sauver(&mut self) {
        self.sauvegarde.clone_from(&self.liste);
    }

    pub fn restaurer(&mut self) {
        self.liste.clone_from(&self.sauvegarde);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: i64) -> Decimal {
        Decimal::depuis_i64(v)
    }

    #[test]
    fn sommet_d_une_pile_vide() {
        let p = Pile::new();
        assert!(p.is_empty());
        assert!(p.sommet().est_zero());
    }

    #[test]
    fn sommets_dans_l_ordre_x_y() {
        let mut p = Pile::new();
        p.empiler([n(1), n(2), n(3)]);
        assert_eq!(p.sommets(2), Some(vec![n(3), n(2)]));
        assert_eq!(p.sommets(4), None);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn retrait_borne() {
        let mut p = Pile::new();
        p.empiler([n(1), n(2)]);
        assert_eq!(p.retirer(3), None);
        assert_eq!(p.len(), 2);
        assert_eq!(p.retirer(2), Some(vec![n(1), n(2)]));
        assert!(p.is_empty());
    }

    #[test]
    fn sauvegarde_restauration() {
        let mut p = Pile::new();
        p.empiler([n(5)]);
        p.sauver();
        p.empiler([n(6), n(7)]);
        p.retirer(3);
        p.restaurer();
        assert_eq!(p.valeurs(), &[n(5)]);

        p.sauver();
        p.vider();
        assert!(p.is_empty());
        p.restaurer();
        assert_eq!(p.len(), 1);
    }
}
