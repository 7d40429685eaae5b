//! Permission catalogue
//!
//! Granular `entite:action` permission strings. The wire form is the
//! French string (`vente:creer`), matching what the web client checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! permissions {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Granular permission (`entite:action`)
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Permission {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl Permission {
            /// Every permission, in catalogue order
            pub const ALL: &'static [Permission] = &[$(Permission::$variant),+];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Permission::$variant => $name,)+
                }
            }
        }

        impl FromStr for Permission {
            type Err = UnknownPermission;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Permission::$variant),)+
                    _ => Err(UnknownPermission(s.to_string())),
                }
            }
        }
    };
}

permissions! {
    // Produits
    ProduitVoir => "produit:voir",
    ProduitCreer => "produit:creer",
    ProduitModifier => "produit:modifier",
    ProduitSupprimer => "produit:supprimer",
    // Catégories
    CategorieVoir => "categorie:voir",
    CategorieCreer => "categorie:creer",
    CategorieModifier => "categorie:modifier",
    CategorieSupprimer => "categorie:supprimer",
    // Ventes
    VenteVoir => "vente:voir",
    VenteCreer => "vente:creer",
    VenteModifier => "vente:modifier",
    VenteAnnuler => "vente:annuler",
    VenteRembourser => "vente:rembourser",
    VenteRemise => "vente:remise",
    // Tables
    TableVoir => "table:voir",
    TableCreer => "table:creer",
    TableModifier => "table:modifier",
    TableSupprimer => "table:supprimer",
    TableTransferer => "table:transferer",
    // Zones
    ZoneVoir => "zone:voir",
    ZoneGerer => "zone:gerer",
    // Sessions de caisse
    SessionVoir => "session:voir",
    SessionOuvrir => "session:ouvrir",
    SessionFermer => "session:fermer",
    CaisseOuvrirTiroir => "caisse:ouvrir_tiroir",
    // Paiements
    PaiementEncaisser => "paiement:encaisser",
    PaiementAnnuler => "paiement:annuler",
    // Clients
    ClientVoir => "client:voir",
    ClientCreer => "client:creer",
    ClientModifier => "client:modifier",
    ClientSupprimer => "client:supprimer",
    ClientFidelite => "client:fidelite",
    // Stock
    StockVoir => "stock:voir",
    StockModifier => "stock:modifier",
    StockInventaire => "stock:inventaire",
    // Rapports
    RapportVoir => "rapport:voir",
    RapportExporter => "rapport:exporter",
    // Utilisateurs
    UtilisateurVoir => "utilisateur:voir",
    UtilisateurCreer => "utilisateur:creer",
    UtilisateurModifier => "utilisateur:modifier",
    UtilisateurSupprimer => "utilisateur:supprimer",
    RoleGerer => "role:gerer",
    // Établissement
    EtablissementVoir => "etablissement:voir",
    EtablissementModifier => "etablissement:modifier",
    ParametresVoir => "parametres:voir",
    ParametresModifier => "parametres:modifier",
    ImpressionGerer => "impression:gerer",
}

impl Permission {
    /// Entity part of the permission (`vente` for `vente:creer`)
    pub fn entity(&self) -> &'static str {
        let s = self.as_str();
        s.split_once(':').map(|(entity, _)| entity).unwrap_or(s)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for an unknown permission string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalogue_has_47_distinct_permissions() {
        assert_eq!(Permission::ALL.len(), 47);
        let names: HashSet<&str> = Permission::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(names.len(), 47);
    }

    #[test]
    fn test_parse_and_display() {
        let p: Permission = "stock:inventaire".parse().unwrap();
        assert_eq!(p, Permission::StockInventaire);
        assert_eq!(p.to_string(), "stock:inventaire");
        assert_eq!(p.entity(), "stock");
        assert!("stock:voler".parse::<Permission>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_name() {
        let json = serde_json::to_string(&Permission::CaisseOuvrirTiroir).unwrap();
        assert_eq!(json, "\"caisse:ouvrir_tiroir\"");
        let p: Permission = serde_json::from_str("\"table:transferer\"").unwrap();
        assert_eq!(p, Permission::TableTransferer);
    }
}
