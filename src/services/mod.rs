// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod identity;
pub mod session;
pub mod users;

pub use identity::{
    FirebaseAuthClient, Identity, IdentityEvent, IdentityProvider, MemoryIdentityProvider,
};
pub use session::{SessionController, SessionState, SignInForm};
pub use users::{filter_users, NewUserForm, UsersCache, UsersService};
