use crate::domain::message::NewMessage;
use crate::dto::main::IndexPageData;
use crate::forms::messages::ContactForm;
use crate::gateway::{BarberReader, BusinessReader, MessageWriter, ServiceCatalogReader};
use crate::services::{ServiceResult, form_error};

/// Loads business info, active services and staff for the landing page.
pub fn load_index_page<G>(gateway: &G) -> ServiceResult<IndexPageData>
where
    G: BusinessReader + ServiceCatalogReader + BarberReader + ?Sized,
{
    let business = gateway.get_business().map_err(|err| {
        log::error!("Failed to load business settings: {err}");
        err
    })?;

    let mut services: Vec<_> = gateway
        .list_services()?
        .into_iter()
        .filter(|service| service.active)
        .collect();
    services.sort_by(|a, b| a.price.total_cmp(&b.price).then_with(|| a.name.cmp(&b.name)));

    let barbers = gateway
        .list_barbers()?
        .into_iter()
        .filter(|barber| barber.active)
        .collect();

    Ok(IndexPageData {
        business,
        services,
        barbers,
    })
}

/// Forwards a contact-form inquiry to the shop inbox.
pub fn send_contact_message<G>(gateway: &G, form: ContactForm) -> ServiceResult<()>
where
    G: MessageWriter + ?Sized,
{
    let message = NewMessage::try_from(form).map_err(form_error)?;

    gateway.send_message(&message).map_err(|err| {
        log::error!("Failed to send contact message: {err}");
        err.into()
    })
}
