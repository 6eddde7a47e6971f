//! Built-in catalog used until an admin saves one.

use chrono::{DateTime, Utc};

use crate::catalog::{Badge, Category, Product, ProductDraft};
use crate::ids::ProductId;

struct SeedRow {
    id: i64,
    name: &'static str,
    category: Category,
    price: f64,
    original_price: Option<f64>,
    description: &'static str,
    badge: Option<Badge>,
    stock: u32,
}

const SEED: [SeedRow; 12] = [
    SeedRow {
        id: 1,
        name: "Sofa Moderno 3 Cuerpos",
        category: Category::Muebles,
        price: 899990.0,
        original_price: Some(1199990.0),
        description: "Elegante sofa de 3 cuerpos con diseno moderno. Tapizado en tela premium color gris.",
        badge: Some(Badge::Bestseller),
        stock: 3,
    },
    SeedRow {
        id: 2,
        name: "Lampara Colgante Dorada",
        category: Category::Decoracion,
        price: 159990.0,
        original_price: None,
        description: "Lampara colgante con acabado en oro mate. Perfecta para comedores y living.",
        badge: Some(Badge::Nuevo),
        stock: 12,
    },
    SeedRow {
        id: 3,
        name: "Espejo Decorativo Circular",
        category: Category::Decoracion,
        price: 79990.0,
        original_price: Some(99990.0),
        description: "Espejo circular con marco de metal dorado. Diametro 60cm.",
        badge: Some(Badge::Oferta),
        stock: 8,
    },
    SeedRow {
        id: 4,
        name: "Mesa de Centro Madera",
        category: Category::Muebles,
        price: 249990.0,
        original_price: None,
        description: "Mesa de centro en madera de roble con patas metalicas negras.",
        badge: None,
        stock: 5,
    },
    SeedRow {
        id: 5,
        name: "Set de Jarrones Ceramica",
        category: Category::Decoracion,
        price: 45990.0,
        original_price: None,
        description: "Set de 3 jarrones de ceramica en tonos neutros. Incluye 3 tamanos.",
        badge: Some(Badge::Nuevo),
        stock: 15,
    },
    SeedRow {
        id: 6,
        name: "Camilla Profesional",
        category: Category::Lashroom,
        price: 189990.0,
        original_price: Some(239990.0),
        description: "Camilla profesional para tratamientos de belleza. Altura ajustable.",
        badge: Some(Badge::Oferta),
        stock: 4,
    },
    SeedRow {
        id: 7,
        name: "Sillon Individual Nordico",
        category: Category::Muebles,
        price: 349990.0,
        original_price: None,
        description: "Sillon individual con diseno nordico. Tela boucle color crema.",
        badge: Some(Badge::Exclusivo),
        stock: 2,
    },
    SeedRow {
        id: 8,
        name: "Cuadro Abstracto Grande",
        category: Category::Decoracion,
        price: 129990.0,
        original_price: None,
        description: "Cuadro abstracto en tonos rosa y dorado. Medidas 100x80cm.",
        badge: None,
        stock: 6,
    },
    SeedRow {
        id: 9,
        name: "Lampara Aro Lashroom",
        category: Category::Lashroom,
        price: 69990.0,
        original_price: None,
        description: "Lampara de aro LED profesional para lashroom. Luz fria y calida.",
        badge: Some(Badge::Nuevo),
        stock: 20,
    },
    SeedRow {
        id: 10,
        name: "Mesa Comedor 6 Personas",
        category: Category::Muebles,
        price: 599990.0,
        original_price: Some(749990.0),
        description: "Mesa de comedor rectangular para 6 personas. Madera y metal.",
        badge: Some(Badge::Oferta),
        stock: 3,
    },
    SeedRow {
        id: 11,
        name: "Reloj de Pared Vintage",
        category: Category::Decoracion,
        price: 54990.0,
        original_price: None,
        description: "Reloj de pared estilo vintage con numeros romanos. Diametro 40cm.",
        badge: None,
        stock: 10,
    },
    SeedRow {
        id: 12,
        name: "Organizador Lashroom",
        category: Category::Lashroom,
        price: 49990.0,
        original_price: None,
        description: "Organizador acrilico para herramientas de lashroom. 5 compartimentos.",
        badge: None,
        stock: 18,
    },
];

/// The twelve starter products, all stamped with `now`.
pub fn seed_products(now: DateTime<Utc>) -> Vec<Product> {
    SEED.iter()
        .map(|row| {
            let mut draft = ProductDraft::new(row.name, row.category, row.price)
                .with_description(row.description)
                .with_stock(row.stock);
            draft.original_price = row.original_price.map(Into::into);
            draft.badge = row.badge;
            Product::from_draft(ProductId::new(row.id), draft, now)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_shape() {
        let products = seed_products(Utc::now());
        assert_eq!(products.len(), 12);
        assert_eq!(products[0].name, "Sofa Moderno 3 Cuerpos");
        assert_eq!(products.iter().filter(|p| p.is_on_sale()).count(), 4);

        let mut ids: Vec<_> = products.iter().map(|p| p.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 12);
    }
}
