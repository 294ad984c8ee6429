//! User-facing labels and messages
//!
//! Portuguese (Brazil) is the product language; English is offered for
//! operators. Server error messages are shown as-is when present, the
//! `Failure` fallbacks only cover responses that carry none.

use std::fmt;
use std::str::FromStr;

use crate::domain::value_objects::{Priority, Role, TicketStatus};
use crate::validation::ValidationError;
use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    PtBr,
    En,
}

impl Locale {
    pub fn tag(self) -> &'static str {
        match self {
            Locale::PtBr => "pt-BR",
            Locale::En => "en",
        }
    }

    fn pick(self, pt: &'static str, en: &'static str) -> &'static str {
        match self {
            Locale::PtBr => pt,
            Locale::En => en,
        }
    }
}

impl FromStr for Locale {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Locale::PtBr),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            _ => Err(DomainError::UnknownLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

pub fn status_label(status: TicketStatus, locale: Locale) -> &'static str {
    match status {
        TicketStatus::Open => locale.pick("Aberto", "Open"),
        TicketStatus::InProgress => locale.pick("Em andamento", "In progress"),
        TicketStatus::Resolved => locale.pick("Resolvido", "Resolved"),
        TicketStatus::Canceled => locale.pick("Cancelado", "Canceled"),
        TicketStatus::Unknown(_) => locale.pick("Desconhecido", "Unknown"),
    }
}

pub fn priority_label(priority: Priority, locale: Locale) -> &'static str {
    match priority {
        Priority::Low => locale.pick("Baixa", "Low"),
        Priority::Medium => locale.pick("Média", "Medium"),
        Priority::High => locale.pick("Alta", "High"),
        Priority::Unknown(_) => locale.pick("Desconhecida", "Unknown"),
    }
}

pub fn role_label(role: &Role, locale: Locale) -> &str {
    match role {
        Role::Admin => locale.pick("Administrador", "Administrator"),
        Role::Atendente => locale.pick("Atendente", "Attendant"),
        Role::Usuario => locale.pick("Usuário", "User"),
        Role::Other(name) => name,
    }
}

/// Dashboard banner for staff roles.
pub fn greeting(role: &Role, locale: Locale) -> Option<&'static str> {
    match role {
        Role::Admin => Some(locale.pick(
            "Você está logado como administrador.",
            "You are logged in as an administrator.",
        )),
        Role::Atendente => Some(locale.pick(
            "Você está logado como atendente.",
            "You are logged in as an attendant.",
        )),
        _ => None,
    }
}

pub fn uncategorized(locale: Locale) -> &'static str {
    locale.pick("Sem categoria", "Uncategorized")
}

pub fn reset_link_sent(locale: Locale) -> &'static str {
    locale.pick(
        "Se um usuário com esse email existir, um link de redefinição de senha será enviado.",
        "If a user with that e-mail exists, a password reset link will be sent.",
    )
}

pub fn password_reset_done(locale: Locale) -> &'static str {
    locale.pick("Senha redefinida com sucesso.", "Password reset successfully.")
}

/// Operations whose failure is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Login,
    Register,
    Logout,
    ForgotPassword,
    ResetPassword,
    LoadTickets,
    LoadTicket,
    LoadHistory,
    CreateTicket,
    EditTicket,
    UpdateTicket,
    AddComment,
    Transfer,
    LoadAttendants,
    LoadUsers,
    ChangeRole,
    BlockUser,
    UnblockUser,
    LoadCategories,
    SaveCategory,
    DeleteCategory,
    SaveSubcategory,
    DeleteSubcategory,
}

impl Failure {
    /// Message shown when the server gives none.
    pub fn fallback(self, locale: Locale) -> &'static str {
        use Failure::*;
        match self {
            Login => locale.pick("Falha no login. Verifique suas credenciais.", "Login failed. Check your credentials."),
            Register => locale.pick(
                "Falha no registro. Verifique os dados e tente novamente.",
                "Registration failed. Check your details and try again.",
            ),
            Logout => locale.pick("Erro ao fazer logout. Tente novamente.", "Logout failed. Try again."),
            ForgotPassword => locale.pick(
                "Ocorreu um erro ao tentar enviar o link de redefinição de senha.",
                "Could not send the password reset link.",
            ),
            ResetPassword => locale.pick(
                "Ocorreu um erro ao redefinir sua senha.",
                "Could not reset your password.",
            ),
            LoadTickets => locale.pick("Erro ao buscar tickets.", "Could not load tickets."),
            LoadTicket => locale.pick("Erro ao carregar o ticket.", "Could not load the ticket."),
            LoadHistory => locale.pick("Erro ao buscar o histórico de tickets.", "Could not load the ticket history."),
            CreateTicket => locale.pick("Falha ao criar o ticket. Tente novamente.", "Could not create the ticket. Try again."),
            EditTicket => locale.pick("Falha ao editar o ticket. Tente novamente.", "Could not edit the ticket. Try again."),
            UpdateTicket => locale.pick("Erro ao atualizar ticket. Tente novamente.", "Could not update the ticket. Try again."),
            AddComment => locale.pick("Erro ao adicionar comentário. Tente novamente.", "Could not add the comment. Try again."),
            Transfer => locale.pick("Erro ao transferir o ticket. Tente novamente.", "Could not transfer the ticket. Try again."),
            LoadAttendants => locale.pick("Erro ao buscar atendentes.", "Could not load attendants."),
            LoadUsers => locale.pick("Erro ao carregar os usuários.", "Could not load users."),
            ChangeRole => locale.pick("Erro ao alterar a role.", "Could not change the role."),
            BlockUser => locale.pick("Erro ao bloquear o usuário.", "Could not block the user."),
            UnblockUser => locale.pick("Erro ao desbloquear o usuário.", "Could not unblock the user."),
            LoadCategories => locale.pick("Erro ao buscar categorias.", "Could not load categories."),
            SaveCategory => locale.pick("Erro ao salvar categoria.", "Could not save the category."),
            DeleteCategory => locale.pick("Erro ao deletar categoria.", "Could not delete the category."),
            SaveSubcategory => locale.pick("Erro ao salvar subcategoria.", "Could not save the subcategory."),
            DeleteSubcategory => locale.pick("Erro ao deletar subcategoria.", "Could not delete the subcategory."),
        }
    }
}

impl ValidationError {
    pub fn localized(&self, locale: Locale) -> String {
        match (self, locale) {
            (_, Locale::En) => self.to_string(),
            (ValidationError::SolutionRequired, _) => "A solução é obrigatória para resolver o ticket.".into(),
            (ValidationError::ReasonRequired, _) => "O motivo do cancelamento é obrigatório.".into(),
            (ValidationError::MissingField(_), _) => "Por favor, preencha todos os campos obrigatórios.".into(),
            (ValidationError::CategoryRequired, _) => "Selecione uma categoria primeiro.".into(),
            (ValidationError::UnknownCategory(id), _) => format!("Categoria {} não encontrada.", id),
            (ValidationError::SubcategoryNotInCategory { .. }, _) => {
                "A subcategoria não pertence à categoria selecionada.".into()
            }
            (ValidationError::TransferTargetRequired, _) => "O e-mail de transferência é obrigatório.".into(),
            (ValidationError::EmptyComment, _) => "O comentário não pode ficar vazio.".into(),
            (ValidationError::PasswordMismatch, _) => "As senhas não coincidem.".into(),
            (ValidationError::PasswordTooShort(min), _) => {
                format!("A senha deve ter pelo menos {} caracteres.", min)
            }
            (ValidationError::NameRequired, _) => "O nome é obrigatório.".into(),
            (ValidationError::InvalidSla(raw), _) => format!("SLA inválido '{}': use HH:MM:SS.", raw),
            (ValidationError::UnsupportedStatus(code), _) => format!("O status {} não pode ser definido.", code),
        }
    }
}
