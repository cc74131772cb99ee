use crate::contract::IncomingDeal;

/// Renders the Telegram alert text for a deal.
///
/// The template is fixed; values are interpolated exactly as received so a
/// decimal price stays decimal and the URL is kept literal.
///
/// Nothing is HTML-escaped even though the text is sent with `parse_mode=HTML`:
/// a destination or URL containing `&`, `<` or `>` is rejected by Telegram with
/// "can't parse entities".
pub fn render_deal_message(deal: &IncomingDeal) -> String {
    let discount = deal.discount();
    format!(
        "🔥 ГОРЯЩИЙ ТУР! Скидка {discount}%\n\
         \n\
         📍 Направление: {destination}\n\
         \n\
         💰 Цена сейчас: {current_price}$\n\
         💸 Была: {original_price}$\n\
         🎯 Экономия: {discount}% OFF\n\
         \n\
         🔗 Забронировать: {url}\n\
         \n\
         ⏰ Найдено: только что",
        destination = deal.destination(),
        current_price = deal.current_price(),
        original_price = deal.original_price(),
        url = deal.url(),
    )
}
