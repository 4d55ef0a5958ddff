use crate::domain::auth::AuthenticatedUser;
use crate::domain::cash::{CashSummary, Movement, export_movements_csv};
use crate::dto::cash::{CashPageData, CashPageQuery};
use crate::forms::cash::AddMovementForm;
use crate::gateway::{BarberReader, CashQuery, CashReader, CashWriter};
use crate::services::{ServiceError, ServiceResult, ensure_staff, form_error};

/// Barbers are pinned to their own ledger; admins may filter by barber.
fn cash_query(user: &AuthenticatedUser, query: &CashPageQuery) -> CashQuery {
    let base = CashQuery::new().between(query.from(), query.to());
    let barber_id = if user.is_admin() {
        query.barber_id()
    } else {
        user.barber_id
    };
    match barber_id {
        Some(barber_id) => base.barber(barber_id),
        None => base,
    }
}

pub fn load_cash_page<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    query: &CashPageQuery,
) -> ServiceResult<CashPageData>
where
    G: CashReader + BarberReader + ?Sized,
{
    ensure_staff(user)?;

    let cash_query = cash_query(user, query);
    let register = gateway.get_cash_register(&cash_query).map_err(|err| {
        log::error!("Failed to load cash register: {err}");
        err
    })?;

    let barbers = if user.is_admin() {
        gateway.list_barbers()?
    } else {
        Vec::new()
    };

    Ok(CashPageData {
        summary: CashSummary::from_register(register),
        from: cash_query.from,
        to: cash_query.to,
        barber_id: cash_query.barber_id,
        barbers,
    })
}

/// Records a manual income or expense on behalf of the current user.
pub fn add_movement<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    form: AddMovementForm,
) -> ServiceResult<Movement>
where
    G: CashWriter + ?Sized,
{
    ensure_staff(user)?;

    let movement = form.into_movement(user.barber_id).map_err(form_error)?;

    gateway.create_movement(&movement).map_err(|err| {
        log::error!("Failed to add cash movement: {err}");
        err.into()
    })
}

/// Ledger for the current filters as a CSV file.
pub fn export_cash_csv<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    query: &CashPageQuery,
) -> ServiceResult<Vec<u8>>
where
    G: CashReader + ?Sized,
{
    ensure_staff(user)?;

    let register = gateway.get_cash_register(&cash_query(user, query))?;
    let summary = CashSummary::from_register(register);

    export_movements_csv(&summary.movements).map_err(|err| {
        log::error!("Failed to export cash movements: {err}");
        ServiceError::Internal(err.to_string())
    })
}
