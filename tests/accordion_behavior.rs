//! Accordion toggling through delegated clicks, including the no-op paths
//! for malformed markup.

use vanilla_widgets::{AccordionConfig, Page, Result};

const DRINKS_PAGE: &str = r#"
<div class='drink'>
  <h3>Gin Fizz</h3>
  <section class='drink-expand-button'>
    <button aria-controls='panel-fizz' aria-expanded='false'>
      <span class='icon'>+</span> details
    </button>
  </section>
  <div id='panel-fizz' aria-hidden='true'>Gin, lemon, sugar, soda.</div>
</div>
<div class='drink'>
  <h3>Negroni</h3>
  <section class='drink-expand-button'>
    <button aria-controls='panel-negroni' aria-expanded='false'>
      <span class='icon'>+</span> details
    </button>
  </section>
  <div id='panel-negroni' aria-hidden='true'>Gin, campari, vermouth.</div>
</div>
"#;

fn drinks_page() -> Result<Page> {
    let mut page = Page::from_html(DRINKS_PAGE)?;
    page.install_accordions(AccordionConfig::default())?;
    Ok(page)
}

#[test]
fn clicking_the_button_toggles_its_panel_attributes() -> Result<()> {
    let mut page = drinks_page()?;
    page.click("[aria-controls='panel-fizz']")?;

    page.assert_attr("#panel-fizz", "aria-hidden", Some("false"))?;
    page.assert_attr("[aria-controls='panel-fizz']", "aria-expanded", Some("true"))?;
    Ok(())
}

#[test]
fn toggling_twice_restores_the_initial_attributes() -> Result<()> {
    let mut page = drinks_page()?;
    page.click("[aria-controls='panel-fizz']")?;
    page.click("[aria-controls='panel-fizz']")?;

    page.assert_attr("#panel-fizz", "aria-hidden", Some("true"))?;
    page.assert_attr("[aria-controls='panel-fizz']", "aria-expanded", Some("false"))?;
    Ok(())
}

#[test]
fn clicks_on_nested_content_resolve_to_the_owning_button() -> Result<()> {
    let mut page = drinks_page()?;
    page.click(".drink-expand-button .icon")?;

    page.assert_attr("#panel-fizz", "aria-hidden", Some("false"))?;
    Ok(())
}

#[test]
fn panels_toggle_independently() -> Result<()> {
    let mut page = drinks_page()?;
    page.click("[aria-controls='panel-fizz']")?;

    page.assert_attr("#panel-fizz", "aria-hidden", Some("false"))?;
    page.assert_attr("#panel-negroni", "aria-hidden", Some("true"))?;

    page.click("[aria-controls='panel-negroni']")?;
    page.assert_attr("#panel-fizz", "aria-hidden", Some("false"))?;
    page.assert_attr("#panel-negroni", "aria-hidden", Some("false"))?;
    Ok(())
}

#[test]
fn container_clicks_outside_any_button_toggle_nothing() -> Result<()> {
    let html = r#"
      <section class='drink-expand-button'>
        <span id='stray'>not a button</span>
        <button aria-controls='panel-1'>go</button>
      </section>
      <div id='panel-1' aria-hidden='true'>body</div>
    "#;
    let mut page = Page::from_html(html)?;
    page.install_accordions(AccordionConfig::default())?;

    page.click("#stray")?;
    page.assert_attr("#panel-1", "aria-hidden", Some("true"))?;
    Ok(())
}

#[test]
fn buttons_without_aria_controls_toggle_nothing() -> Result<()> {
    let html = r#"
      <section class='drink-expand-button'>
        <button id='bare'>go</button>
      </section>
      <div id='panel-1' aria-hidden='true'>body</div>
    "#;
    let mut page = Page::from_html(html)?;
    page.install_accordions(AccordionConfig::default())?;

    page.click("#bare")?;
    page.assert_attr("#panel-1", "aria-hidden", Some("true"))?;
    page.assert_attr("#bare", "aria-expanded", None)?;
    Ok(())
}

#[test]
fn dangling_aria_controls_toggles_nothing() -> Result<()> {
    let html = r#"
      <section class='drink-expand-button'>
        <button id='dangling' aria-controls='nope'>go</button>
      </section>
    "#;
    let mut page = Page::from_html(html)?;
    page.install_accordions(AccordionConfig::default())?;

    page.click("#dangling")?;
    page.assert_attr("#dangling", "aria-expanded", None)?;
    Ok(())
}

#[test]
fn missing_aria_hidden_is_treated_like_false() -> Result<()> {
    let html = r#"
      <section class='drink-expand-button'>
        <button aria-controls='panel-1'>go</button>
      </section>
      <div id='panel-1'>body</div>
    "#;
    let mut page = Page::from_html(html)?;
    page.install_accordions(AccordionConfig::default())?;

    page.click("[aria-controls='panel-1']")?;
    page.assert_attr("#panel-1", "aria-hidden", Some("true"))?;
    page.assert_attr("[aria-controls='panel-1']", "aria-expanded", Some("false"))?;
    Ok(())
}

#[test]
fn installing_on_a_page_without_containers_is_fine() -> Result<()> {
    let mut page = Page::from_html("<div class='drink'>Mojito</div>")?;
    page.install_accordions(AccordionConfig::default())?;
    page.click(".drink")?;
    Ok(())
}
