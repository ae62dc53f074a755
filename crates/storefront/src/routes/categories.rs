//! Category route handlers.

use axum::{Json, extract::State};

use shopora_core::api::{CategoriesResponse, CategoryResponse, CategoryView};
use shopora_core::query::CategoryListParams;

use super::images::present_category;
use crate::error::{AppError, Result};
use crate::extract::{ApiPath, ApiQuery};
use crate::state::AppState;

/// Active categories in display order, optionally with product counts.
#[tracing::instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CategoryListParams>,
) -> Result<Json<CategoriesResponse>> {
    let with_counts = params.include_product_count()?;
    let categories = state.catalog().active_categories().await?;

    let counts = if with_counts {
        Some(state.catalog().product_counts().await?)
    } else {
        None
    };

    let categories = categories
        .into_iter()
        .map(|category| CategoryView {
            product_count: counts
                .as_ref()
                .map(|counts| counts.get(&category.id).copied().unwrap_or(0)),
            category: present_category(&state, category),
        })
        .collect();

    Ok(Json(CategoriesResponse { categories }))
}

/// Single active category by slug, always with its product count.
#[tracing::instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<CategoryResponse>> {
    let category = state
        .catalog()
        .active_category(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let count = state.catalog().product_count(category.id).await?;

    Ok(Json(CategoryResponse {
        category: CategoryView {
            category: present_category(&state, category),
            product_count: Some(count),
        },
    }))
}
