//! End-to-end behavior of the navigation search overlay: open/close chrome,
//! the live row filter, and the form guards, driven through synthetic events.

use vanilla_widgets::{Error, OverlayPhase, Page, Result, SearchOverlayConfig};

const MENU_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<body>
  <nav class='p-navigation'>
    <button class='js-search-button' aria-label='open search'>Search</button>
    <form class='p-search-box'>
      <input class='p-search-box__input' type='search'>
      <button class='p-search-box__reset' type='reset'>Clear</button>
      <button id='go' type='submit'>Go</button>
    </form>
    <div class='p-navigation__search-overlay'></div>
  </nav>
  <div class='grid p-strip'>
    <div id='fizz' class='drink'>Gin Fizz</div>
    <div id='tonic' class='drink'>Gin <b>Tonic</b></div>
    <div id='punch' class='drink'>Rum Punch</div>
  </div>
</body>
</html>
"#;

fn menu_page() -> Result<Page> {
    let mut page = Page::from_html(MENU_PAGE)?;
    page.install_search_overlay(SearchOverlayConfig::default())?;
    Ok(page)
}

#[test]
fn trigger_click_opens_overlay_and_focuses_input() -> Result<()> {
    let mut page = menu_page()?;
    page.assert_lacks_class(".p-navigation", "has-search-open")?;
    page.assert_nothing_focused()?;

    page.click(".js-search-button")?;

    page.assert_has_class(".p-navigation", "has-search-open")?;
    page.assert_focused(".p-search-box__input")?;
    page.assert_attr(".js-search-button", "aria-pressed", Some("true"))?;
    assert_eq!(page.overlay_phase(0), Some(OverlayPhase::Open));
    Ok(())
}

#[test]
fn second_trigger_click_closes_overlay() -> Result<()> {
    let mut page = menu_page()?;
    page.click(".js-search-button")?;
    page.click(".js-search-button")?;

    page.assert_lacks_class(".p-navigation", "has-search-open")?;
    page.assert_attr(".js-search-button", "aria-pressed", None)?;
    assert_eq!(page.overlay_phase(0), Some(OverlayPhase::Closed));
    Ok(())
}

#[test]
fn every_trigger_tracks_the_pressed_state() -> Result<()> {
    let html = r#"
      <nav class='p-navigation'>
        <button id='first' class='js-search-button'>Search</button>
        <button id='second' class='js-search-button'>Search</button>
        <input class='p-search-box__input'>
        <div class='p-navigation__search-overlay'></div>
      </nav>
      <div class='drink'>Negroni</div>
    "#;
    let mut page = Page::from_html(html)?;
    page.install_search_overlay(SearchOverlayConfig::minimal())?;

    page.click("#first")?;
    page.assert_attr("#first", "aria-pressed", Some("true"))?;
    page.assert_attr("#second", "aria-pressed", Some("true"))?;

    page.click("#second")?;
    page.assert_attr("#first", "aria-pressed", None)?;
    page.assert_attr("#second", "aria-pressed", None)?;
    Ok(())
}

#[test]
fn typing_filters_rows_case_insensitively() -> Result<()> {
    let mut page = menu_page()?;
    page.click(".js-search-button")?;
    page.type_text(".p-search-box__input", "GIN")?;

    page.assert_visible("#fizz")?;
    page.assert_visible("#tonic")?;
    page.assert_hidden("#punch")?;
    Ok(())
}

#[test]
fn filter_matches_text_nested_in_child_elements() -> Result<()> {
    let mut page = menu_page()?;
    page.type_text(".p-search-box__input", "tonic")?;

    page.assert_hidden("#fizz")?;
    page.assert_visible("#tonic")?;
    page.assert_hidden("#punch")?;
    Ok(())
}

#[test]
fn clearing_the_query_restores_every_row() -> Result<()> {
    let mut page = menu_page()?;
    page.type_text(".p-search-box__input", "rum")?;
    page.assert_hidden("#fizz")?;

    page.type_text(".p-search-box__input", "")?;
    page.assert_visible("#fizz")?;
    page.assert_visible("#tonic")?;
    page.assert_visible("#punch")?;
    Ok(())
}

#[test]
fn filtering_works_while_the_overlay_is_closed() -> Result<()> {
    // Keyup listeners fire regardless of the overlay chrome state.
    let mut page = menu_page()?;
    page.type_text(".p-search-box__input", "punch")?;

    page.assert_lacks_class(".p-navigation", "has-search-open")?;
    page.assert_hidden("#fizz")?;
    page.assert_visible("#punch")?;
    Ok(())
}

#[test]
fn escape_closes_without_refiltering() -> Result<()> {
    let mut page = menu_page()?;
    page.click(".js-search-button")?;
    page.type_text(".p-search-box__input", "gin")?;
    page.assert_hidden("#punch")?;

    page.press_key(".p-search-box__input", "Escape")?;

    page.assert_lacks_class(".p-navigation", "has-search-open")?;
    // Rows keep the visibility the last filter pass gave them.
    page.assert_hidden("#punch")?;
    page.assert_visible("#fizz")?;
    assert_eq!(page.overlay_phase(0), Some(OverlayPhase::Closed));
    Ok(())
}

#[test]
fn escape_while_closed_is_a_no_op_close() -> Result<()> {
    let mut page = menu_page()?;
    page.press_key(".p-search-box__input", "Escape")?;
    page.assert_lacks_class(".p-navigation", "has-search-open")?;
    assert_eq!(page.overlay_phase(0), Some(OverlayPhase::Closed));
    Ok(())
}

#[test]
fn backdrop_click_closes_the_overlay() -> Result<()> {
    let mut page = menu_page()?;
    page.click(".js-search-button")?;
    page.click(".p-navigation__search-overlay")?;

    page.assert_lacks_class(".p-navigation", "has-search-open")?;
    page.assert_attr(".js-search-button", "aria-pressed", None)?;
    Ok(())
}

#[test]
fn reset_restores_rows_without_closing_or_clearing_the_input() -> Result<()> {
    let mut page = menu_page()?;
    page.click(".js-search-button")?;
    page.type_text(".p-search-box__input", "rum")?;
    page.assert_hidden("#fizz")?;

    page.click(".p-search-box__reset")?;

    page.assert_visible("#fizz")?;
    page.assert_visible("#tonic")?;
    page.assert_visible("#punch")?;
    page.assert_has_class(".p-navigation", "has-search-open")?;
    page.assert_value(".p-search-box__input", "rum")?;
    Ok(())
}

#[test]
fn submit_is_guarded_and_blurs_the_active_element() -> Result<()> {
    let mut page = menu_page()?;
    page.click(".js-search-button")?;
    page.assert_focused(".p-search-box__input")?;

    page.click("#go")?;

    page.assert_nothing_focused()?;
    page.assert_has_class(".p-navigation", "has-search-open")?;
    Ok(())
}

#[test]
fn content_offset_tracks_the_overlay_state() -> Result<()> {
    let mut page = menu_page()?;
    page.click(".js-search-button")?;
    assert_eq!(
        page.attr(".grid.p-strip", "style")?.as_deref(),
        Some("margin-top: 118px;")
    );

    page.click(".js-search-button")?;
    assert_eq!(
        page.attr(".grid.p-strip", "style")?.as_deref(),
        Some("margin-top: 48px;")
    );
    Ok(())
}

#[test]
fn reopening_after_close_works() -> Result<()> {
    let mut page = menu_page()?;
    page.click(".js-search-button")?;
    page.click(".p-navigation__search-overlay")?;
    page.click(".js-search-button")?;

    page.assert_has_class(".p-navigation", "has-search-open")?;
    page.assert_focused(".p-search-box__input")?;
    Ok(())
}

#[test]
fn minimal_variant_runs_without_form_reset_or_content() -> Result<()> {
    let html = r#"
      <nav class='p-navigation'>
        <button class='js-search-button'>Search</button>
        <input class='p-search-box__input'>
        <div class='p-navigation__search-overlay'></div>
      </nav>
      <div id='mojito' class='drink'>Mojito</div>
      <div id='negroni' class='drink'>Negroni</div>
    "#;
    let mut page = Page::from_html(html)?;
    page.install_search_overlay(SearchOverlayConfig::minimal())?;

    page.click(".js-search-button")?;
    page.assert_has_class(".p-navigation", "has-search-open")?;

    page.type_text(".p-search-box__input", "moj")?;
    page.assert_visible("#mojito")?;
    page.assert_hidden("#negroni")?;
    Ok(())
}

#[test]
fn install_fails_fast_when_a_required_element_is_missing() -> Result<()> {
    let mut page = Page::from_html("<nav class='p-navigation'></nav>")?;
    let err = page
        .install_search_overlay(SearchOverlayConfig::minimal())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::MissingElement { ref selector, .. } if selector == ".p-search-box__input"
    ));
    Ok(())
}

#[test]
fn install_fails_when_an_optional_selector_is_configured_but_absent() -> Result<()> {
    // Default config names the form, reset, and content selectors; absent
    // here, so installation must refuse rather than degrade silently.
    let html = r#"
      <nav class='p-navigation'>
        <button class='js-search-button'>Search</button>
        <input class='p-search-box__input'>
        <div class='p-navigation__search-overlay'></div>
      </nav>
    "#;
    let mut page = Page::from_html(html)?;
    let err = page
        .install_search_overlay(SearchOverlayConfig::default())
        .unwrap_err();
    assert!(matches!(err, Error::MissingElement { .. }));
    Ok(())
}

#[test]
fn trace_records_overlay_transitions() -> Result<()> {
    let mut page = menu_page()?;
    page.enable_trace(true);
    page.set_trace_stderr(false);

    page.click(".js-search-button")?;
    page.press_key(".p-search-box__input", "Escape")?;

    let logs = page.take_trace_logs();
    assert!(logs.iter().any(|line| line.contains("[overlay] Closed -> Open")));
    assert!(logs.iter().any(|line| line.contains("[overlay] Open -> Closed")));
    Ok(())
}
