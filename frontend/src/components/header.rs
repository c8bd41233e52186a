use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Continents,
    Countries,
    Cities,
    Map,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Continents,
        Tab::Countries,
        Tab::Cities,
        Tab::Map,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Continents => "Continents",
            Tab::Countries => "Countries",
            Tab::Cities => "Cities",
            Tab::Map => "Map",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub active: Tab,
    pub on_select: Callback<Tab>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    html! {
        <header class="header">
            <div class="container">
                <h1>{"GeoWiki"}</h1>
                <nav class="tab-bar">
                    {for Tab::ALL.iter().map(|&tab| {
                        let onclick = {
                            let on_select = props.on_select.clone();
                            Callback::from(move |_: MouseEvent| on_select.emit(tab))
                        };
                        html! {
                            <button
                                class={classes!("tab", (props.active == tab).then_some("active"))}
                                {onclick}
                            >
                                {tab.label()}
                            </button>
                        }
                    })}
                </nav>
            </div>
        </header>
    }
}
