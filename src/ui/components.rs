/// Reusable UI components

use patternfly_yew::prelude::{Alert, AlertType};
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// A short message shown at the top of the page
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct NoticeBannerProps {
    pub notice: Notice,
    pub ondismiss: Callback<MouseEvent>,
}

#[function_component(NoticeBanner)]
pub fn notice_banner(props: &NoticeBannerProps) -> Html {
    let alert_type = match props.notice.kind {
        NoticeKind::Info => AlertType::Info,
        NoticeKind::Success => AlertType::Success,
        NoticeKind::Error => AlertType::Danger,
    };

    html! {
        <div class="notification">
            <Alert r#type={alert_type} title={props.notice.message.clone()} inline={true}>
            </Alert>
            <button class="close-btn" onclick={props.ondismiss.clone()}>{"×"}</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub title: AttrValue,
    pub onclose: Callback<()>,
    pub children: Children,
}

/// Dialog over a backdrop; clicking the backdrop or the close button calls `onclose`
#[function_component(Modal)]
pub fn modal(props: &ModalProps) -> Html {
    let on_backdrop = {
        let onclose = props.onclose.clone();
        Callback::from(move |e: MouseEvent| {
            if e.target() == e.current_target() {
                onclose.emit(());
            }
        })
    };
    let on_close_btn = props.onclose.reform(|_: MouseEvent| ());

    html! {
        <div class="modal active" onclick={on_backdrop}>
            <div class="modal-content">
                <div class="modal-header">
                    <h2>{props.title.clone()}</h2>
                    <button class="close-btn" onclick={on_close_btn}>{"×"}</button>
                </div>
                <div class="modal-body">
                    {props.children.clone()}
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct EmptyStateProps {
    pub icon: AttrValue,
    pub message: AttrValue,
}

#[function_component(EmptyState)]
pub fn empty_state(props: &EmptyStateProps) -> Html {
    html! {
        <div class="empty-state">
            <i class={props.icon.to_string()}></i>
            <p>{props.message.clone()}</p>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_constructors() {
        assert_eq!(Notice::success("ok").kind, NoticeKind::Success);
        assert_eq!(Notice::error(String::from("bad")).message, "bad");
        assert_eq!(Notice::info("fyi").kind, NoticeKind::Info);
    }
}
