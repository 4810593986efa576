//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use emerald_core::{Price, Product, ProductId};

use crate::actions;
use crate::catalog::ProductFilter;
use crate::error::{AppError, Result};
use crate::middleware::Shopper;
use crate::state::AppState;

/// Query string for the product listing.
///
/// `category` is a comma-separated list.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub category: Option<String>,
}

impl From<ProductQuery> for ProductFilter {
    fn from(query: ProductQuery) -> Self {
        Self {
            query: query.q,
            min_price: query.min_price.map(Price::from_cents),
            max_price: query.max_price.map(Price::from_cents),
            categories: query
                .category
                .iter()
                .flat_map(|list| list.split(','))
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    pub related: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct Showcase {
    pub featured: Vec<Product>,
    pub trending: Vec<Product>,
}

/// Search and filter the catalog.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<ProductList> {
    let filter = ProductFilter::from(query);
    let products: Vec<Product> = state
        .catalog()
        .search(&filter)
        .into_iter()
        .cloned()
        .collect();

    Json(ProductList {
        total: products.len(),
        products,
    })
}

/// Product detail with related products. Records the view in the shopper's history.
#[instrument(skip(state, shopper))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut shopper: Shopper,
) -> Result<Response> {
    let id = ProductId::new(id);
    let product = state
        .catalog()
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    actions::view_product(shopper.context.recently_viewed_mut(), product);

    let detail = ProductDetail {
        product: product.clone(),
        related: state.catalog().related(product).into_iter().cloned().collect(),
    };
    shopper.respond(detail).await
}

/// Distinct catalog categories.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .catalog()
            .categories()
            .into_iter()
            .map(String::from)
            .collect(),
    )
}

/// Featured and trending rows for the home page.
#[instrument(skip(state))]
pub async fn showcase(State(state): State<AppState>) -> Json<Showcase> {
    Json(Showcase {
        featured: state.catalog().featured().to_vec(),
        trending: state.catalog().trending().to_vec(),
    })
}
